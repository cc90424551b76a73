//! Remote sync for Keben delivery reports.
//!
//! Reports are always saved locally first. Pushing to the remote table is
//! best effort: the result is recorded on the stored report as its sync
//! status, and failed reports can be pushed again later.
//!
//! ## Components
//!
//! - **Remote**: [`RemoteTable`] is the insert seam; [`RestTable`] talks to a
//!   PostgREST endpoint.
//! - **Row**: [`RemoteReportRow`] is the wire shape, shared with change-feed
//!   consumers.
//! - **Orchestrator**: [`SubmissionOrchestrator`] runs validate, save, push,
//!   record.

mod error;
mod orchestrator;
mod remote;
mod rest;
mod row;

pub use error::{SubmissionError, SyncError, SyncResult};
pub use orchestrator::{RemoteOutcome, SubmissionOrchestrator, SubmissionOutcome, SweepSummary};
pub use remote::RemoteTable;
pub use rest::{RestTable, RestTableConfig};
pub use row::{RemoteReportRow, SHEET_COLUMNS};
