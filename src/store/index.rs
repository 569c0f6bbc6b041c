//! Append-only JSONL metadata index
//!
//! One JSON object per line per processed item. The file is never rewritten
//! in place: startup does a bounded reader pass to seed the dedup index,
//! after which the run only appends. Records from interrupted runs stay
//! valid seed data. Unknown fields are ignored on read so the format can
//! grow without breaking older files.

use crate::extract::ExtractionMethod;
use crate::store::StorageError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Mutex;

/// Outcome of processing one candidate URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Accepted,
    Duplicate,
    Error,
}

/// One immutable provenance record; never mutated or deleted once appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// UTC timestamp, RFC 3339 with seconds precision
    pub fetched_at: String,

    pub category: String,
    pub source: String,
    pub url: String,
    pub status: RecordStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<ExtractionMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetadataRecord {
    fn base(category: &str, source: &str, url: &str, status: RecordStatus) -> Self {
        Self {
            fetched_at: now_timestamp(),
            category: category.to_string(),
            source: source.to_string(),
            url: url.to_string(),
            status,
            fingerprint: None,
            bytes: None,
            title: None,
            page_index: None,
            extraction_method: None,
            error: None,
        }
    }

    pub fn accepted(
        category: &str,
        source: &str,
        url: &str,
        fingerprint: String,
        bytes: u64,
        method: ExtractionMethod,
    ) -> Self {
        let mut record = Self::base(category, source, url, RecordStatus::Accepted);
        record.fingerprint = Some(fingerprint);
        record.bytes = Some(bytes);
        record.extraction_method = Some(method);
        record
    }

    pub fn duplicate(category: &str, source: &str, url: &str, fingerprint: String) -> Self {
        let mut record = Self::base(category, source, url, RecordStatus::Duplicate);
        record.fingerprint = Some(fingerprint);
        record
    }

    pub fn error(category: &str, source: &str, url: &str, reason: &str) -> Self {
        let mut record = Self::base(category, source, url, RecordStatus::Error);
        record.error = Some(reason.to_string());
        record
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_page_index(mut self, page_index: u32) -> Self {
        self.page_index = Some(page_index);
        self
    }
}

fn now_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Handle to the append-only index file
///
/// Appends are serialized behind a mutex so concurrent sources never
/// interleave partial lines.
pub struct MetaIndex {
    file: Mutex<File>,
}

impl MetaIndex {
    /// Opens (or creates) the index for appending
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one record as a single JSON line
    pub fn append(&self, record: &MetadataRecord) -> Result<(), StorageError> {
        let line = serde_json::to_string(record)?;
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }
}

/// Replays the index and returns the fingerprints of accepted records
///
/// A missing file is an empty seed. Malformed lines (e.g. from a crash
/// mid-append by an older, non-atomic writer) are skipped with a warning
/// rather than failing the run.
pub fn load_seen_fingerprints(path: &Path) -> Result<Vec<String>, StorageError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut fingerprints = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<MetadataRecord>(&line) {
            Ok(record) => {
                if record.status == RecordStatus::Accepted {
                    if let Some(fp) = record.fingerprint {
                        fingerprints.push(fp);
                    }
                }
            }
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} malformed lines while seeding dedup index from {}",
            skipped,
            path.display()
        );
    }

    Ok(fingerprints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta/index.jsonl");

        let index = MetaIndex::open(&path).unwrap();
        index
            .append(&MetadataRecord::accepted(
                "news",
                "sample",
                "https://example.test/a",
                "sha256:abc".to_string(),
                120,
                ExtractionMethod::Primary,
            ))
            .unwrap();
        index
            .append(&MetadataRecord::duplicate(
                "news",
                "sample",
                "https://example.test/b",
                "sha256:abc".to_string(),
            ))
            .unwrap();
        index
            .append(&MetadataRecord::error(
                "news",
                "sample",
                "https://example.test/c",
                "no-text",
            ))
            .unwrap();

        // Only the accepted record seeds dedup
        let seen = load_seen_fingerprints(&path).unwrap();
        assert_eq!(seen, vec!["sha256:abc".to_string()]);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_append_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.jsonl");

        {
            let index = MetaIndex::open(&path).unwrap();
            index
                .append(&MetadataRecord::error("c", "s", "u1", "boom"))
                .unwrap();
        }
        {
            // Reopening must not clobber prior records
            let index = MetaIndex::open(&path).unwrap();
            index
                .append(&MetadataRecord::error("c", "s", "u2", "boom"))
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("u1"));
        assert!(content.contains("u2"));
    }

    #[test]
    fn test_missing_index_is_empty_seed() {
        let dir = tempfile::tempdir().unwrap();
        let seen = load_seen_fingerprints(&dir.path().join("absent.jsonl")).unwrap();
        assert!(seen.is_empty());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.jsonl");

        let good = serde_json::to_string(&MetadataRecord::accepted(
            "c",
            "s",
            "u",
            "sha256:def".to_string(),
            10,
            ExtractionMethod::Fallback,
        ))
        .unwrap();
        std::fs::write(&path, format!("{{truncated\n{}\n", good)).unwrap();

        let seen = load_seen_fingerprints(&path).unwrap();
        assert_eq!(seen, vec!["sha256:def".to_string()]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.jsonl");

        let line = r#"{"fetched_at":"2026-01-01T00:00:00Z","category":"c","source":"s","url":"u","status":"accepted","fingerprint":"sha256:xyz","future_field":42}"#;
        std::fs::write(&path, format!("{}\n", line)).unwrap();

        let seen = load_seen_fingerprints(&path).unwrap();
        assert_eq!(seen, vec!["sha256:xyz".to_string()]);
    }

    #[test]
    fn test_timestamp_format() {
        let record = MetadataRecord::error("c", "s", "u", "x");
        // RFC 3339, seconds precision, UTC designator
        assert!(record.fetched_at.ends_with('Z'));
        assert!(!record.fetched_at.contains('.'));
    }
}
