//! Submission flow: validate, save locally, then push.
//!
//! The local write is the only step that can fail a submission. The remote
//! push is best effort and its result is recorded on the saved report.

use crate::error::{SubmissionError, SyncError};
use crate::remote::RemoteTable;
use keben_model::{validate, RawInput, Report, ReportDraft};
use keben_storage::{ReportStore, StoreError, StoreResult};
use keben_types::{RemoteId, ReportId, SyncStatus};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// What happened on the remote side of a submission.
#[derive(Debug)]
pub enum RemoteOutcome {
    /// The remote accepted the row.
    Synced(RemoteId),
    /// The push failed; the report is kept locally for a later retry.
    Failed(SyncError),
    /// The report was already synced; nothing was pushed.
    AlreadySynced,
    /// Another call is pushing this report right now; nothing was pushed.
    InProgress,
}

impl RemoteOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_) | Self::AlreadySynced)
    }
}

/// Result of a submission that was saved locally.
#[derive(Debug)]
pub struct SubmissionOutcome {
    /// The report as it now stands in the store.
    pub report: Report,
    /// Remote result.
    pub remote: RemoteOutcome,
    /// Set when the remote result could not be written back. The stored
    /// report keeps its previous status in that case.
    pub status_error: Option<StoreError>,
}

impl SubmissionOutcome {
    /// Operator-facing summary line.
    pub fn message(&self) -> String {
        match &self.remote {
            RemoteOutcome::Synced(_) => "saved and synced".to_string(),
            RemoteOutcome::AlreadySynced => "already synced".to_string(),
            RemoteOutcome::InProgress => "sync already in progress".to_string(),
            RemoteOutcome::Failed(e) => format!("saved locally, sync failed: {e}"),
        }
    }
}

/// Counts from a retry sweep. Reports another call is still pushing are
/// not attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

/// Drives submissions and retries against one store and one remote.
///
/// Every method takes `&self` and submissions may run concurrently. A report
/// is pushed by at most one call at a time.
pub struct SubmissionOrchestrator {
    store: Arc<ReportStore>,
    remote: Arc<dyn RemoteTable>,
    in_flight: Mutex<HashSet<ReportId>>,
}

/// Marks a report as being pushed until dropped.
struct PushClaim<'a> {
    in_flight: &'a Mutex<HashSet<ReportId>>,
    id: ReportId,
}

impl Drop for PushClaim<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl SubmissionOrchestrator {
    pub fn new(store: Arc<ReportStore>, remote: Arc<dyn RemoteTable>) -> Self {
        Self {
            store,
            remote,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> &Arc<ReportStore> {
        &self.store
    }

    /// Validates and saves a report, then pushes it to the remote.
    ///
    /// Returns an error only when nothing was saved.
    pub async fn submit(&self, input: RawInput) -> Result<SubmissionOutcome, SubmissionError> {
        let details = validate(&input)?;
        let draft = ReportDraft::new(details);

        // Claimed before the append so a concurrent sweep never sees it unclaimed.
        let _claim = self.claim(&draft.id);
        let report = self.with_store(move |store| store.append(draft)).await?;
        debug!("Saved report {} locally", report.id);

        Ok(self.push_and_record(report).await)
    }

    /// Pushes one stored report again.
    ///
    /// A report that is already synced is returned as is.
    pub async fn resync(&self, id: &ReportId) -> StoreResult<SubmissionOutcome> {
        let Some(_claim) = self.claim(id) else {
            debug!("Report {} is already being pushed", id);
            return Ok(SubmissionOutcome {
                report: self.load(id).await?,
                remote: RemoteOutcome::InProgress,
                status_error: None,
            });
        };

        let report = self.load(id).await?;
        if report.sync_status == SyncStatus::Synced {
            debug!("Report {} is already synced", report.id);
            return Ok(SubmissionOutcome {
                report,
                remote: RemoteOutcome::AlreadySynced,
                status_error: None,
            });
        }

        Ok(self.push_and_record(report).await)
    }

    /// Pushes every pending or failed report, oldest first.
    pub async fn sweep(&self) -> StoreResult<SweepSummary> {
        let pending = self.with_store(|store| store.unsynced()).await?;
        let mut summary = SweepSummary::default();

        for candidate in pending {
            let Some(_claim) = self.claim(&candidate.id) else {
                debug!("Skipping report {}, already being pushed", candidate.id);
                continue;
            };
            // Another call may have synced it since the list was read.
            let report = self.load(&candidate.id).await?;
            if !report.sync_status.needs_sync() {
                continue;
            }
            summary.attempted += 1;
            let outcome = self.push_and_record(report).await;
            if outcome.remote.is_synced() {
                summary.synced += 1;
            } else {
                summary.failed += 1;
            }
        }

        info!(
            "Sweep pushed {} reports: {} synced, {} failed",
            summary.attempted, summary.synced, summary.failed
        );
        Ok(summary)
    }

    async fn load(&self, id: &ReportId) -> StoreResult<Report> {
        let lookup = id.clone();
        self.with_store(move |store| store.get(&lookup))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Returns `None` if the report is already being pushed.
    fn claim(&self, id: &ReportId) -> Option<PushClaim<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(id.clone()) {
            return None;
        }
        Some(PushClaim {
            in_flight: &self.in_flight,
            id: id.clone(),
        })
    }

    async fn push_and_record(&self, report: Report) -> SubmissionOutcome {
        let (remote, status, remote_id) = match self.remote.push(&report).await {
            Ok(remote_id) => (
                RemoteOutcome::Synced(remote_id.clone()),
                SyncStatus::Synced,
                Some(remote_id),
            ),
            Err(e) => {
                warn!(
                    "Push of report {} to {} failed (retryable: {}): {}",
                    report.id,
                    self.remote.provider_name(),
                    e.is_retryable(),
                    e
                );
                (RemoteOutcome::Failed(e), SyncStatus::Failed, None)
            }
        };

        let id = report.id.clone();
        let recorded = self
            .with_store(move |store| store.update_sync_status(&id, status, remote_id.as_ref()))
            .await;

        match recorded {
            // The store keeps `Synced` final; a late failure does not undo it.
            Ok(updated) if updated.sync_status == SyncStatus::Synced && !remote.is_synced() => {
                SubmissionOutcome {
                    report: updated,
                    remote: RemoteOutcome::AlreadySynced,
                    status_error: None,
                }
            }
            Ok(updated) => SubmissionOutcome {
                report: updated,
                remote,
                status_error: None,
            },
            Err(e) => {
                error!(
                    "Could not record {} for report {}; it stays {}: {}",
                    status, report.id, report.sync_status, e
                );
                SubmissionOutcome {
                    report,
                    remote,
                    status_error: Some(e),
                }
            }
        }
    }

    /// Runs a store call off the async runtime.
    async fn with_store<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&ReportStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::WriteFailed(format!("store task panicked: {e}")))?
    }
}
