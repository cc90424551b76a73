//! Error types for the sync layer.

use keben_model::ValidationErrors;
use keben_storage::StoreError;
use thiserror::Error;

/// Result type for remote operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors from pushing a report to the remote table.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure, timeout, or a server-side status worth retrying.
    #[error("network error: {0}")]
    Network(String),

    /// The remote refused the row; retrying the same payload will not help.
    #[error("rejected by remote: {0}")]
    Rejected(String),
}

impl SyncError {
    /// Whether a later retry of the same push may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors that stop a submission before it is saved locally.
///
/// Remote failures never appear here; they are recorded on the report.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// One or more fields failed validation. Nothing was stored.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The local store refused the report.
    #[error("could not save report: {0}")]
    Store(#[from] StoreError),
}
