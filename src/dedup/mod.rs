//! Content fingerprinting and duplicate rejection
//!
//! A fingerprint is a SHA-256 digest over the normalized text bytes, so two
//! documents with equal normalized content collide regardless of which
//! source produced them. The index is shared across every source in the run
//! and is seeded from prior runs' metadata records.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Mutex;

/// Computes the content fingerprint for normalized text
///
/// The `sha256:` prefix is part of the persisted format; readers of the
/// metadata index rely on it to know the digest algorithm.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Returns the filename-safe prefix of a fingerprint (16 hex chars)
pub fn fingerprint_prefix(fp: &str) -> &str {
    let digest = fp.strip_prefix("sha256:").unwrap_or(fp);
    &digest[..digest.len().min(16)]
}

/// Process-wide set of accepted fingerprints
///
/// `check_and_register` is atomic under one lock, so two documents with
/// identical content can never both be accepted even when sources run
/// concurrently.
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: Mutex<HashSet<String>>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index pre-seeded with fingerprints from prior runs
    pub fn with_seed(seed: impl IntoIterator<Item = String>) -> Self {
        Self {
            seen: Mutex::new(seed.into_iter().collect()),
        }
    }

    /// Registers a fingerprint; returns true when it was already present
    pub fn check_and_register(&self, fp: &str) -> bool {
        let mut seen = self.seen.lock().unwrap();
        !seen.insert(fp.to_string())
    }

    /// Removes a fingerprint whose document ended up not being accepted
    ///
    /// Called when a registered document is later discarded (budget overflow,
    /// persistence failure), so the same content can still be accepted from
    /// another source or a later candidate.
    pub fn forget(&self, fp: &str) {
        self.seen.lock().unwrap().remove(fp);
    }

    /// Number of distinct fingerprints seen so far
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint("hello corpus");
        assert!(fp.starts_with("sha256:"));
        assert_eq!(fp.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("same text"), fingerprint("same text"));
        assert_ne!(fingerprint("text a"), fingerprint("text b"));
    }

    #[test]
    fn test_fingerprint_prefix() {
        let fp = fingerprint("hello");
        let prefix = fingerprint_prefix(&fp);
        assert_eq!(prefix.len(), 16);
        assert!(!prefix.contains(':'));
    }

    #[test]
    fn test_check_and_register() {
        let index = DedupIndex::new();
        let fp = fingerprint("document");

        assert!(!index.check_and_register(&fp));
        assert!(index.check_and_register(&fp));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_forget_reopens_fingerprint() {
        let index = DedupIndex::new();
        let fp = fingerprint("discarded document");

        assert!(!index.check_and_register(&fp));
        index.forget(&fp);

        // The content counts as unseen again
        assert!(!index.check_and_register(&fp));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_seeded_index_rejects_known_content() {
        let fp = fingerprint("known");
        let index = DedupIndex::with_seed(vec![fp.clone()]);

        assert!(index.check_and_register(&fp));
        assert!(!index.check_and_register(&fingerprint("new")));
    }

    #[test]
    fn test_concurrent_registration_admits_one() {
        use std::sync::Arc;

        let index = Arc::new(DedupIndex::new());
        let fp = fingerprint("contended");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                let fp = fp.clone();
                std::thread::spawn(move || index.check_and_register(&fp))
            })
            .collect();

        let fresh_insertions = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|was_duplicate| !was_duplicate)
            .count();

        // Exactly one thread saw the fingerprint as new
        assert_eq!(fresh_insertions, 1);
    }
}
