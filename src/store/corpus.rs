//! Processed-document file writer

use crate::dedup::fingerprint_prefix;
use crate::extract::ExtractedDocument;
use crate::store::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes accepted documents into the category/source corpus tree
#[derive(Debug, Clone)]
pub struct CorpusStore {
    root: PathBuf,
}

impl CorpusStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic path for a document:
    /// `<root>/<category>/<source>/<category>-<source>-<fp16>.txt`
    ///
    /// Distinct documents get distinct names (fingerprint prefix); a
    /// re-crawled identical document maps to the same path and overwrites
    /// idempotently.
    pub fn document_path(&self, category: &str, source_key: &str, fp: &str) -> PathBuf {
        self.root.join(category).join(source_key).join(format!(
            "{}-{}-{}.txt",
            category,
            source_key,
            fingerprint_prefix(fp)
        ))
    }

    /// Writes a document atomically, returning its final path
    ///
    /// Content goes to a temporary sibling first and is renamed into place,
    /// so a crash mid-write never leaves a truncated document behind.
    pub fn write(&self, doc: &ExtractedDocument, fp: &str) -> Result<PathBuf, StorageError> {
        let path = self.document_path(&doc.category, &doc.source_key, fp);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("txt.tmp");
        fs::write(&tmp, doc.text.as_bytes())?;
        fs::rename(&tmp, &path)?;

        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
