//! Text normalization applied to every extracted document

use regex::Regex;
use std::sync::OnceLock;

fn blank_lines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").unwrap())
}

fn horizontal_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

fn word_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z][A-Za-z\-']+").unwrap())
}

/// Normalizes extracted prose
///
/// Carriage returns become newlines, runs of blank lines collapse to one
/// blank line, runs of spaces/tabs collapse to a single space, and the
/// result is trimmed.
pub fn normalize_text(text: &str) -> String {
    let text = text.replace('\r', "\n");
    let text = blank_lines().replace_all(&text, "\n\n");
    let text = horizontal_runs().replace_all(&text, " ");
    text.trim().to_string()
}

/// Reduces text to a lowercase word-token stream joined by single spaces
///
/// Used by word-only mode; the token pattern requires at least two letters,
/// allowing internal hyphens and apostrophes.
pub fn words_only(text: &str) -> String {
    word_token()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
