//! Candidate discovery from HTML index (listing) pages

use crate::config::SourceConfig;
use crate::fetch::{Fetcher, Transport};
use crate::frontier::pagination::{page_limit, page_url};
use crate::frontier::Candidate;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A matching link found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLink {
    pub url: String,
    pub title: Option<String>,
}

/// Resolves candidates from a single or paginated HTML index
///
/// Pages are visited in order. A page fetch failure is treated as an
/// implicit empty page: it is logged and pagination stops, but whatever was
/// already collected stands. Cross-page duplicate URLs are suppressed so
/// each candidate is yielded at most once per source per run.
pub async fn resolve_index<T: Transport>(
    fetcher: &Fetcher<T>,
    source: &SourceConfig,
    index_url: &str,
    link_regex: &Regex,
    exhaust: bool,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    let (start, pages) = match &source.paginate {
        Some(paginate) => (paginate.start, page_limit(paginate, exhaust)),
        None => (0, 1),
    };
    let stop_on_empty = source
        .paginate
        .as_ref()
        .map_or(true, |p| p.stop_on_empty);

    for offset in 0..pages {
        let page = start + offset;
        let target = match &source.paginate {
            Some(paginate) => match page_url(index_url, &paginate.param, page) {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!("Bad index URL for source {}: {}", source.key, e);
                    break;
                }
            },
            None => index_url.to_string(),
        };

        let outcome = fetcher.fetch(&target).await;
        if outcome.blocked {
            tracing::error!(
                "Index page fetch failed for source {} ({}): HTTP {}",
                source.key,
                target,
                outcome.status_code
            );
            break;
        }

        let links = extract_index_links(&outcome.body, &target, link_regex);
        let mut new_on_page = 0usize;
        for link in links {
            if candidates.len() >= source.max_index {
                break;
            }
            if !seen_urls.insert(link.url.clone()) {
                continue;
            }
            new_on_page += 1;
            candidates.push(Candidate {
                url: link.url,
                source_key: source.key.clone(),
                page_index: page,
                title: link.title,
            });
        }

        tracing::debug!(
            "Index page {} for source {}: {} new links, {} total",
            target,
            source.key,
            new_on_page,
            candidates.len()
        );

        if candidates.len() >= source.max_index {
            break;
        }
        if stop_on_empty && new_on_page == 0 {
            break;
        }
    }

    candidates
}

/// Extracts links matching the source rule from one index page
///
/// Hrefs are resolved against the page URL before matching, so the regex
/// always sees absolute URLs. Non-http(s) schemes are skipped.
pub fn extract_index_links(html: &str, base_url: &str, link_regex: &Regex) -> Vec<IndexLink> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href.trim()) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }

        let absolute = resolved.to_string();
        if !link_regex.is_match(&absolute) {
            continue;
        }

        let title = {
            let text = element.text().collect::<String>();
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        links.push(IndexLink {
            url: absolute,
            title,
        });
    }

    links
}
