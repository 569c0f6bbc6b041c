//! Generic HTML-to-text fallback extraction
//!
//! Walks the document for content-bearing elements, skipping obvious
//! boilerplate containers (navigation, headers, footers, scripts). This tier
//! always produces something for any page with visible body text, which makes
//! it the safety net under the primary article extractor.

use scraper::{ElementRef, Html, Selector};

/// Elements whose entire subtree is treated as boilerplate
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "template",
];

/// Content-bearing elements collected in document order
const CONTENT_SELECTOR: &str = "p, h1, h2, h3, h4, h5, li, blockquote, pre, figcaption";

/// Extracts visible text from the page, one block element per line
///
/// Returns an empty string when the page has no recognizable text blocks and
/// no body text at all.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(CONTENT_SELECTOR) else {
        return String::new();
    };

    let mut blocks = Vec::new();
    for element in document.select(&selector) {
        if inside_boilerplate(&element) || inside_content_block(&element) {
            continue;
        }
        let text = element_text(&element);
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    if !blocks.is_empty() {
        return blocks.join("\n");
    }

    // No block elements at all; take loose text, still skipping boilerplate
    loose_body_text(&document)
}

/// Direct text of every non-boilerplate element under (and including) body
fn loose_body_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("body, body *") else {
        return String::new();
    };

    let mut parts = Vec::new();
    for element in document.select(&selector) {
        if BOILERPLATE_TAGS.contains(&element.value().name()) || inside_boilerplate(&element) {
            continue;
        }
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        }
    }

    parts.join(" ")
}

/// Collects the text of an element's subtree with normalized spacing
pub fn element_text(element: &ElementRef) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn inside_boilerplate(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| BOILERPLATE_TAGS.contains(&e.name()))
    })
}

/// True when an ancestor is itself a content block (its text already covers
/// this element, so counting both would duplicate it)
fn inside_content_block(element: &ElementRef) -> bool {
    const BLOCK_TAGS: &[&str] = &[
        "p", "h1", "h2", "h3", "h4", "h5", "li", "blockquote", "pre", "figcaption",
    ];
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| BLOCK_TAGS.contains(&e.name()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_paragraph_text() {
        let html = "<html><body><p>First paragraph.</p><p>Second one.</p></body></html>";
        let text = extract_text(html);
        assert_eq!(text, "First paragraph.\nSecond one.");
    }

    #[test]
    fn test_skips_script_and_style() {
        let html = r#"<html><head><style>p { color: red }</style></head>
            <body><script>var x = "hidden";</script><p>Visible.</p></body></html>"#;
        let text = extract_text(html);
        assert_eq!(text, "Visible.");
    }

    #[test]
    fn test_skips_nav_and_footer_blocks() {
        let html = r#"<html><body>
            <nav><li>Home</li><li>About</li></nav>
            <p>Article body.</p>
            <footer><p>Copyright notice</p></footer>
            </body></html>"#;
        let text = extract_text(html);
        assert_eq!(text, "Article body.");
    }

    #[test]
    fn test_nested_blocks_not_duplicated() {
        let html = "<html><body><blockquote><p>Quoted words.</p></blockquote></body></html>";
        let text = extract_text(html);
        assert_eq!(text, "Quoted words.");
    }

    #[test]
    fn test_bare_body_text_as_last_resort() {
        let html = "<html><body>Just loose text, no blocks.</body></html>";
        let text = extract_text(html);
        assert_eq!(text, "Just loose text, no blocks.");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(extract_text("<html><body></body></html>"), "");
    }

    #[test]
    fn test_loose_text_skips_boilerplate_too() {
        let html = r#"<html><body><script>var hidden = 1;</script>
            <nav><a href="/">Home</a></nav>
            Loose words only.</body></html>"#;
        assert_eq!(extract_text(html), "Loose words only.");
    }
}
