//! Gleaner: a configured corpus crawler
//!
//! This crate ingests text documents from a declarative registry of web
//! sources (RSS feeds, plain or paginated HTML indexes) into a deduplicated,
//! categorized corpus on disk, appending one provenance record per processed
//! item to a durable JSONL index.

pub mod collect;
pub mod config;
pub mod dedup;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod report;
pub mod store;

use thiserror::Error;

/// Main error type for gleaner operations
///
/// These are the run-aborting failures surfaced at startup (bad
/// configuration, index open, HTTP client construction). Per-URL conditions
/// never appear here; the collector absorbs them and records them in the
/// metadata index.
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] store::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid link regex for source '{key}': {message}")]
    InvalidRegex { key: String, message: String },
}

/// Result type alias for gleaner operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use collect::{run_crawl, RunBudget, RunOptions, SourceState};
pub use config::{Config, SourceConfig};
pub use dedup::{fingerprint, DedupIndex};
pub use extract::{ExtractedDocument, ExtractionMethod, Extractor};
pub use fetch::{FetchOutcome, Fetcher};
pub use store::{MetadataRecord, RecordStatus};
