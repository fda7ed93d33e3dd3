//! Error types for the ciphertext store.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this label already exists.
    #[error("label already exists: {0}")]
    Conflict(String),

    /// No record carries this label.
    #[error("label not found: {0}")]
    NotFound(String),

    /// The store document has never been written.
    #[error("store document not found: {}", .0.display())]
    Missing(PathBuf),

    /// The document exists but is not a JSON array of records.
    #[error("store document is corrupt: {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Serialization error while writing the document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for errors a caller caused (duplicate or unknown label, absent
    /// document) as opposed to failures of the medium itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::Conflict(_) | StoreError::NotFound(_) | StoreError::Missing(_)
        )
    }
}
