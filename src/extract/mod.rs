//! Two-tier content extraction
//!
//! Tier one is the rich article extractor; tier two strips generic visible
//! text. The first tier that produces usable text wins and is recorded in
//! the document's `extraction_method`, which ends up in the metadata index.

mod fallback;
mod normalize;
mod primary;

pub use normalize::{normalize_text, words_only};

use crate::fetch::FetchOutcome;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which extraction tier produced a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Primary,
    Fallback,
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A document ready for dedup and persistence
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub url: String,
    pub category: String,
    pub source_key: String,
    /// Normalized text; token stream instead of prose in word-only mode
    pub text: String,
    pub char_count: usize,
    pub extraction_method: ExtractionMethod,
}

/// Per-URL extraction failure; recorded and skipped, never fatal
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("empty response body")]
    EmptyBody,

    #[error("no text content after extraction")]
    NoText,
}

/// Extraction pipeline configured once per run
///
/// `primary_enabled` is the constructor-time availability check for the rich
/// tier: when false, every document is attributed to the fallback tier.
pub struct Extractor {
    primary_enabled: bool,
    word_only: bool,
}

impl Extractor {
    pub fn new(primary_enabled: bool, word_only: bool) -> Self {
        Self {
            primary_enabled,
            word_only,
        }
    }

    /// Converts a fetched page into a normalized document
    pub fn extract(
        &self,
        outcome: &FetchOutcome,
        category: &str,
        source_key: &str,
    ) -> Result<ExtractedDocument, ExtractError> {
        if outcome.body.trim().is_empty() {
            return Err(ExtractError::EmptyBody);
        }

        let (raw_text, method) = match self.try_primary(&outcome.body) {
            Some(text) => (text, ExtractionMethod::Primary),
            None => (fallback::extract_text(&outcome.body), ExtractionMethod::Fallback),
        };

        let mut text = normalize_text(&raw_text);
        if self.word_only {
            text = words_only(&text);
        }

        if text.is_empty() {
            return Err(ExtractError::NoText);
        }

        Ok(ExtractedDocument {
            url: outcome.url.clone(),
            category: category.to_string(),
            source_key: source_key.to_string(),
            char_count: text.chars().count(),
            text,
            extraction_method: method,
        })
    }

    fn try_primary(&self, body: &str) -> Option<String> {
        if !self.primary_enabled {
            return None;
        }
        primary::extract_article(body).filter(|t| !normalize_text(t).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_with_body(body: &str) -> FetchOutcome {
        FetchOutcome {
            url: "https://example.test/articles/1".to_string(),
            status_code: 200,
            body: body.to_string(),
            content_type: Some("text/html".to_string()),
            attempt_count: 1,
            blocked: false,
        }
    }

    const ARTICLE_HTML: &str = r#"<html><body>
        <nav><a href="/">Home</a></nav>
        <article><p>A sufficiently long article paragraph that the rich tier
        will accept as the main content of this mocked page.</p></article>
        </body></html>"#;

    #[test]
    fn test_primary_tier_wins_when_enabled() {
        let extractor = Extractor::new(true, false);
        let doc = extractor
            .extract(&outcome_with_body(ARTICLE_HTML), "news", "sample")
            .unwrap();

        assert_eq!(doc.extraction_method, ExtractionMethod::Primary);
        assert!(doc.text.contains("sufficiently long article"));
        assert!(!doc.text.contains("Home"));
    }

    #[test]
    fn test_fallback_when_primary_disabled() {
        let extractor = Extractor::new(false, false);
        let doc = extractor
            .extract(&outcome_with_body(ARTICLE_HTML), "news", "sample")
            .unwrap();

        assert_eq!(doc.extraction_method, ExtractionMethod::Fallback);
        assert!(doc.text.contains("sufficiently long article"));
    }

    #[test]
    fn test_fallback_when_no_article_container() {
        let extractor = Extractor::new(true, false);
        let html = "<html><body><p>Plain page with a single paragraph.</p></body></html>";
        let doc = extractor
            .extract(&outcome_with_body(html), "news", "sample")
            .unwrap();

        assert_eq!(doc.extraction_method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_word_only_mode_changes_stored_text() {
        let extractor = Extractor::new(true, true);
        let doc = extractor
            .extract(&outcome_with_body(ARTICLE_HTML), "news", "sample")
            .unwrap();

        assert!(doc.text.starts_with("sufficiently long article"));
        assert!(doc.text.chars().all(|c| !c.is_uppercase()));
        assert!(!doc.text.contains('\n'));
    }

    #[test]
    fn test_empty_body_is_error() {
        let extractor = Extractor::new(true, false);
        let err = extractor
            .extract(&outcome_with_body("   "), "news", "sample")
            .unwrap_err();
        assert!(matches!(err, ExtractError::EmptyBody));
    }

    #[test]
    fn test_no_text_is_error() {
        let extractor = Extractor::new(true, false);
        let err = extractor
            .extract(
                &outcome_with_body("<html><body><script>1</script></body></html>"),
                "news",
                "sample",
            )
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoText));
    }

    #[test]
    fn test_char_count_matches_text() {
        let extractor = Extractor::new(false, false);
        let doc = extractor
            .extract(&outcome_with_body(ARTICLE_HTML), "news", "sample")
            .unwrap();
        assert_eq!(doc.char_count, doc.text.chars().count());
    }
}
