//! Embedding/Index Store — one flat L2 vector index plus a positionally aligned
//! metadata corpus per content type, persisted write-through on every mutation.
//!
//! ARCHITECTURAL RULE: the index and corpus of a content type are only ever
//! mutated together, under that content type's write lock, inside `store.rs`.

use thiserror::Error;

pub mod embedder;
pub mod flat;
pub mod handlers;
pub mod migration;
pub mod persistence;
pub mod render;
pub mod store;

pub use embedder::{Embedder, HashEmbedder};
pub use store::{Ack, IndexStore};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Empty text, cannot embed")]
    EmptyInput,

    #[error("Invalid content type '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidContentType(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Index for '{content_type}' holds {index_len} vectors but corpus holds {corpus_len} entries")]
    Inconsistent {
        content_type: String,
        index_len: usize,
        corpus_len: usize,
    },

    #[error("Invalid magic bytes in index file")]
    InvalidMagic,

    #[error("Unsupported index format version: {0}")]
    UnsupportedVersion(u32),

    #[error("Index file is empty or truncated")]
    Truncated,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corpus serialization error: {0}")]
    Corpus(#[from] serde_json::Error),
}

impl IndexError {
    /// Input errors are the caller's fault and are reported as validation failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IndexError::EmptyInput
                | IndexError::InvalidContentType(_)
                | IndexError::DimensionMismatch { .. }
        )
    }
}
