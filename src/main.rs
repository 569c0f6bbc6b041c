//! Gleaner main entry point
//!
//! Command-line interface for the gleaner corpus crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gleaner::collect::{run_crawl, RunOptions};
use gleaner::config::{load_config_with_hash, select_sources, Config};
use gleaner::fetch::{Fetcher, HttpTransport};
use gleaner::frontier;
use gleaner::report::format_run_summary;

/// Gleaner: a configured corpus crawler
///
/// Gleaner ingests text documents from a declarative registry of web sources
/// (RSS feeds, plain or paginated HTML indexes) into a deduplicated,
/// categorized corpus on disk, with an append-only JSONL metadata index.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version = "0.1.0")]
#[command(about = "A configured corpus crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Only collect these categories (comma-separated names)
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Only collect these sources (comma-separated keys)
    #[arg(long, value_delimiter = ',')]
    sources: Vec<String>,

    /// Resolve every selected source's frontier and exit without fetching documents
    #[arg(long)]
    validate_sources: bool,

    /// Widen pagination past each source's configured page cap
    #[arg(long)]
    exhaust_pagination: bool,

    /// Persist a lowercase word-token stream instead of prose text
    #[arg(long)]
    word_only: bool,

    /// Override the configured byte budget for this run
    #[arg(long, value_name = "N")]
    target_bytes: Option<u64>,

    /// Override the configured item budget for this run
    #[arg(long, value_name = "N")]
    max_items: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(target_bytes) = cli.target_bytes {
        tracing::info!("Byte budget overridden to {} for this run", target_bytes);
        config.budget.target_bytes = target_bytes;
    }
    if let Some(max_items) = cli.max_items {
        tracing::info!("Item budget overridden to {} for this run", max_items);
        config.budget.max_items = max_items;
    }

    if cli.validate_sources {
        handle_validate_sources(&config, &cli).await?;
    } else {
        handle_crawl(&config, &cli, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --validate-sources: resolves each selected frontier and reports
/// candidate counts, without fetching or persisting any document
async fn handle_validate_sources(
    config: &Config,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Source Validation ===\n");

    let fetcher = Fetcher::<HttpTransport>::from_settings(&config.crawler)?;
    let selections = select_sources(config, &cli.categories, &cli.sources);
    let mut failures = 0usize;

    for selected in &selections {
        match frontier::resolve(&fetcher, &selected.source, cli.exhaust_pagination).await {
            Ok(candidates) => {
                println!(
                    "  {}/{}: {} candidate URLs",
                    selected.category,
                    selected.source.key,
                    candidates.len()
                );
            }
            Err(e) => {
                failures += 1;
                println!("  {}/{}: FAILED ({})", selected.category, selected.source.key, e);
            }
        }
    }

    println!(
        "\n{} sources checked, {} failed",
        selections.len(),
        failures
    );
    if failures > 0 {
        return Err(format!("{} sources failed validation", failures).into());
    }
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    cli: &Cli,
    config_hash: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = RunOptions {
        categories: cli.categories.clone(),
        sources: cli.sources.clone(),
        word_only: cli.word_only,
        exhaust_pagination: cli.exhaust_pagination,
        config_hash,
    };

    match run_crawl(config, &options).await {
        Ok(summary) => {
            if summary.cancelled {
                tracing::info!("Crawl cancelled; partial results were persisted");
            } else {
                tracing::info!("Crawl completed successfully");
            }
            println!("{}", format_run_summary(&summary));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
