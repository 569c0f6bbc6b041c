use crate::config::types::{BudgetSettings, Config, CrawlerSettings, Pagination, SourceConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_settings(&config.crawler)?;
    validate_budget_settings(&config.budget)?;

    if config.output.corpus_dir.is_empty() {
        return Err(ConfigError::Validation(
            "corpus_dir cannot be empty".to_string(),
        ));
    }
    if config.output.index_path.is_empty() {
        return Err(ConfigError::Validation(
            "index_path cannot be empty".to_string(),
        ));
    }

    let mut seen_categories = HashSet::new();
    let mut seen_keys = HashSet::new();

    for category in &config.categories {
        if category.name.is_empty() {
            return Err(ConfigError::Validation(
                "category name cannot be empty".to_string(),
            ));
        }
        if !seen_categories.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category '{}'",
                category.name
            )));
        }

        for source in &category.sources {
            validate_source(source)?;
            if !seen_keys.insert(source.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate source key '{}'",
                    source.key
                )));
            }
        }
    }

    Ok(())
}

fn validate_crawler_settings(settings: &CrawlerSettings) -> Result<(), ConfigError> {
    if settings.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if settings.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1".to_string(),
        ));
    }

    if settings.max_concurrent_sources < 1 || settings.max_concurrent_sources > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_sources must be between 1 and 64, got {}",
            settings.max_concurrent_sources
        )));
    }

    Ok(())
}

fn validate_budget_settings(budget: &BudgetSettings) -> Result<(), ConfigError> {
    if budget.target_bytes == 0 {
        return Err(ConfigError::Validation(
            "target_bytes must be >= 1".to_string(),
        ));
    }
    if budget.max_items == 0 {
        return Err(ConfigError::Validation(
            "max_items must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates a single source descriptor
///
/// An enabled source must have at least one of `rss` or `html_index`, and its
/// `link_regex` must compile. Disabled sources still get a syntax check so a
/// bad entry is caught before someone flips it on.
fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    if source.key.is_empty() {
        return Err(ConfigError::Validation(
            "source key cannot be empty".to_string(),
        ));
    }

    if source
        .key
        .chars()
        .any(|c| !c.is_alphanumeric() && c != '-' && c != '_')
    {
        return Err(ConfigError::Validation(format!(
            "source key '{}' must contain only alphanumerics, '-' or '_'",
            source.key
        )));
    }

    if source.enabled && source.rss.is_none() && source.html_index.is_none() {
        return Err(ConfigError::Validation(format!(
            "enabled source '{}' must set rss or html_index",
            source.key
        )));
    }

    for (field, value) in [("rss", &source.rss), ("html_index", &source.html_index)] {
        if let Some(value) = value {
            Url::parse(value).map_err(|e| {
                ConfigError::InvalidUrl(format!("{} for source '{}': {}", field, source.key, e))
            })?;
        }
    }

    regex::Regex::new(&source.link_regex).map_err(|e| ConfigError::InvalidRegex {
        key: source.key.clone(),
        message: e.to_string(),
    })?;

    if source.max_index == 0 {
        return Err(ConfigError::Validation(format!(
            "max_index for source '{}' must be >= 1",
            source.key
        )));
    }

    if let Some(paginate) = &source.paginate {
        validate_pagination(&source.key, paginate)?;
    }

    Ok(())
}

fn validate_pagination(key: &str, paginate: &Pagination) -> Result<(), ConfigError> {
    if paginate.mode != "query" {
        return Err(ConfigError::Validation(format!(
            "unknown pagination mode '{}' for source '{}' (only 'query' is supported)",
            paginate.mode, key
        )));
    }

    if paginate.param.is_empty() {
        return Err(ConfigError::Validation(format!(
            "pagination param for source '{}' cannot be empty",
            key
        )));
    }

    if paginate.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages for source '{}' must be >= 1",
            key
        )));
    }

    Ok(())
}
