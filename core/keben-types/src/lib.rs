//! Core type definitions for Keben delivery reports.
//!
//! This crate defines the small, dependency-light types shared by every other
//! crate in the workspace:
//! - Report identifiers (UUID v7 for new reports, free-form for legacy ones)
//! - The sync status lifecycle of a stored report
//!
//! The report schema itself lives in `keben-model`.

mod ids;
mod status;

pub use ids::{RemoteId, ReportId};
pub use status::SyncStatus;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid report id: {0:?}")]
    InvalidId(String),

    #[error("unknown sync status: {0:?}")]
    UnknownStatus(String),
}
