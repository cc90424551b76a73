//! Error types for the local store.

use keben_types::ReportId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in local store operations.
///
/// Every variant means the local copy could not be read or written as asked;
/// callers must not report a submission as saved when `append` returns one.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The report could not be encoded.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// The backend refused the write (quota, disk, database error).
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// The backend could not be read.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// No report with this id.
    #[error("report not found: {0}")]
    NotFound(ReportId),

    /// A report with this id is already stored.
    #[error("duplicate report id: {0}")]
    DuplicateId(ReportId),

    /// The stored value is not a report list; it is left as is.
    #[error("stored report list is corrupted: {0}")]
    Corrupted(String),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}
