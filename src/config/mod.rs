//! Configuration loading, validation, and source selection

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    BudgetScope, BudgetSettings, Category, Config, CrawlerSettings, OutputSettings, Pagination,
    SourceConfig,
};
pub use validation::validate;

/// A source paired with the category it belongs to, in configuration order
#[derive(Debug, Clone)]
pub struct SelectedSource {
    pub category: String,
    pub source: SourceConfig,
}

/// Filters the configured sources by category names and source keys
///
/// Empty filters mean "all". Disabled sources are always skipped. The result
/// preserves configuration order: categories in the order they appear, then
/// sources in the order they appear within each category.
pub fn select_sources(config: &Config, categories: &[String], sources: &[String]) -> Vec<SelectedSource> {
    let mut selected = Vec::new();

    for category in &config.categories {
        if !categories.is_empty() && !categories.contains(&category.name) {
            continue;
        }
        for source in &category.sources {
            if !sources.is_empty() && !sources.contains(&source.key) {
                continue;
            }
            if !source.enabled {
                continue;
            }
            selected.push(SelectedSource {
                category: category.name.clone(),
                source: source.clone(),
            });
        }
    }

    selected
}
