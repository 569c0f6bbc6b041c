//! Frontier generation: source descriptor -> ordered candidate URLs
//!
//! For each source exactly one discovery mode applies, checked in order:
//! RSS feed, then HTML index (single or paginated). The resulting candidate
//! list is finite, in discovery order, and contains each URL at most once
//! per source per run.

mod html_index;
mod pagination;
mod rss;

pub use html_index::{extract_index_links, IndexLink};
pub use pagination::{page_limit, page_url};

use crate::config::SourceConfig;
use crate::fetch::{Fetcher, Transport};
use crate::ConfigError;
use regex::Regex;

/// A resolved, absolute candidate URL awaiting collection
///
/// Consumed exactly once by the collector; no URL is revisited within a run.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub url: String,
    pub source_key: String,
    /// Index page the candidate was discovered on (0 for RSS / single index)
    pub page_index: u32,
    /// Anchor text or feed entry title, when present
    pub title: Option<String>,
}

/// Resolves the frontier for one source
///
/// The only error here is a link regex that fails to compile, which is a
/// configuration-level failure; every network or parse problem during
/// discovery degrades to a shorter (possibly empty) frontier instead.
pub async fn resolve<T: Transport>(
    fetcher: &Fetcher<T>,
    source: &SourceConfig,
    exhaust_pagination: bool,
) -> Result<Vec<Candidate>, ConfigError> {
    let link_regex = Regex::new(&source.link_regex).map_err(|e| ConfigError::InvalidRegex {
        key: source.key.clone(),
        message: e.to_string(),
    })?;

    if let Some(feed_url) = &source.rss {
        return Ok(rss::resolve_feed(fetcher, source, feed_url, &link_regex).await);
    }

    if let Some(index_url) = &source.html_index {
        return Ok(html_index::resolve_index(
            fetcher,
            source,
            index_url,
            &link_regex,
            exhaust_pagination,
        )
        .await);
    }

    // Disabled-at-runtime or misconfigured source; validation normally
    // prevents this for enabled sources.
    Ok(Vec::new())
}
