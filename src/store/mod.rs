//! Durable outputs: the processed corpus tree and the metadata index
//!
//! Documents land under `<corpus_dir>/<category>/<source>/` with names
//! derived from the content fingerprint; provenance records are appended to
//! a JSONL index that doubles as the dedup seed for later runs.

mod corpus;
mod index;

pub use corpus::CorpusStore;
pub use index::{load_seen_fingerprints, MetaIndex, MetadataRecord, RecordStatus};

use thiserror::Error;

/// Persistence-layer errors
///
/// Per-document write failures are absorbed by the collector (the document
/// is treated as not accepted); index open failures at startup are fatal.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize metadata record: {0}")]
    Serialize(#[from] serde_json::Error),
}
