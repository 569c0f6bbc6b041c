//! Primary article extraction tier
//!
//! A readability-style pass: locate the densest article container and take
//! its text blocks, ignoring everything outside it. Returns `None` when no
//! container is convincing, which hands the page to the fallback tier.

use crate::extract::fallback::element_text;
use scraper::{Html, Selector};

/// Candidate containers, most specific first
const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    ".article-body",
    ".post-content",
    ".entry-content",
];

/// Minimum character count for a container to be accepted as the article
const MIN_ARTICLE_CHARS: usize = 80;

/// Attempts rich article extraction
///
/// Picks the candidate container with the most text. A short container is
/// rejected rather than returned, so index pages and stub articles fall
/// through to the generic extractor instead of producing fragments.
pub fn extract_article(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut best: Option<String> = None;
    for selector_str in CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for container in document.select(&selector) {
            let text = container_text(&container);
            if text.len() > best.as_ref().map_or(0, |b| b.len()) {
                best = Some(text);
            }
        }
    }

    best.filter(|text| text.len() >= MIN_ARTICLE_CHARS)
}

/// Text blocks within one container, boilerplate children skipped
fn container_text(container: &scraper::ElementRef) -> String {
    let Ok(block_selector) = Selector::parse("p, h1, h2, h3, h4, h5, li, blockquote, pre") else {
        return String::new();
    };

    let blocks: Vec<String> = container
        .select(&block_selector)
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
        .collect();

    if blocks.is_empty() {
        element_text(container)
    } else {
        blocks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PARAGRAPH: &str = "This paragraph is long enough to convince the extractor \
        that it found a real article body rather than a navigation fragment.";

    #[test]
    fn test_prefers_article_over_page_chrome() {
        let html = format!(
            r#"<html><body>
            <nav><a href="/">Home</a></nav>
            <article><p>{}</p></article>
            <footer>About us</footer>
            </body></html>"#,
            LONG_PARAGRAPH
        );
        let text = extract_article(&html).unwrap();
        assert_eq!(text, LONG_PARAGRAPH);
    }

    #[test]
    fn test_rejects_short_containers() {
        let html = "<html><body><article><p>Too short.</p></article></body></html>";
        assert!(extract_article(html).is_none());
    }

    #[test]
    fn test_no_container_returns_none() {
        let html = format!("<html><body><p>{}</p></body></html>", LONG_PARAGRAPH);
        assert!(extract_article(&html).is_none());
    }

    #[test]
    fn test_picks_densest_container() {
        let html = format!(
            r#"<html><body>
            <main><p>A modest amount of teaser text shown in the hero area.</p></main>
            <article><p>{}</p><p>{}</p></article>
            </body></html>"#,
            LONG_PARAGRAPH, LONG_PARAGRAPH
        );
        let text = extract_article(&html).unwrap();
        assert!(text.contains("convince the extractor"));
        assert_eq!(text.lines().count(), 2);
    }
}
