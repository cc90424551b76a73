//! Remote table abstraction.

use crate::error::SyncResult;
use async_trait::async_trait;
use keben_model::Report;
use keben_types::RemoteId;

/// A remote table that accepts report inserts.
///
/// Implementations only talk to the remote; recording the outcome on the
/// local copy is the caller's job.
#[async_trait]
pub trait RemoteTable: Send + Sync {
    /// Returns the name of the remote, for logs.
    fn provider_name(&self) -> &'static str;

    /// Inserts one report and returns the id the remote assigned to it.
    async fn push(&self, report: &Report) -> SyncResult<RemoteId>;
}
