//! Candidate discovery from RSS feeds

use crate::config::SourceConfig;
use crate::fetch::{Fetcher, Transport};
use crate::frontier::Candidate;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    link: Option<String>,
    title: Option<String>,
}

/// Resolves candidates from an RSS feed
///
/// The feed is fetched and parsed once; entry links matching the source's
/// rule are yielded in feed order, capped by `max_index`. A failed feed
/// fetch or an unparseable document is an empty frontier for this source,
/// never a run failure.
pub async fn resolve_feed<T: Transport>(
    fetcher: &Fetcher<T>,
    source: &SourceConfig,
    feed_url: &str,
    link_regex: &Regex,
) -> Vec<Candidate> {
    let outcome = fetcher.fetch(feed_url).await;
    if outcome.blocked {
        tracing::error!(
            "Feed fetch failed for source {} ({}): HTTP {}",
            source.key,
            feed_url,
            outcome.status_code
        );
        return Vec::new();
    }

    let feed: RssDocument = match quick_xml::de::from_str(&outcome.body) {
        Ok(feed) => feed,
        Err(e) => {
            tracing::error!("Unparseable feed for source {}: {}", source.key, e);
            return Vec::new();
        }
    };

    let mut candidates = Vec::new();
    for item in feed.channel.items {
        if candidates.len() >= source.max_index {
            break;
        }
        let Some(link) = item.link else {
            continue;
        };
        let link = link.trim().to_string();
        if !link_regex.is_match(&link) {
            continue;
        }
        candidates.push(Candidate {
            url: link,
            source_key: source.key.clone(),
            page_index: 0,
            title: item.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        });
    }

    candidates
}
