//! The append-only report list.

use crate::backend::{KvBackend, MemoryBackend, SqliteBackend};
use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use keben_model::{Report, ReportDraft};
use keben_types::{RemoteId, ReportId, SyncStatus};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Key the report list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "keben_reports";

/// Persistent, append-only list of delivery reports.
///
/// Share one instance (behind an `Arc`) per backend: the write lock lives on
/// the store, so two stores over the same backend would not serialize their
/// writes against each other.
pub struct ReportStore {
    backend: Arc<dyn KvBackend>,
    key: String,
    write_lock: Mutex<()>,
}

impl ReportStore {
    /// Opens (or creates) a store in a SQLite file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::with_backend(Arc::new(SqliteBackend::open(path)?)))
    }

    /// Opens a store that lives only as long as the process (for testing).
    pub fn open_in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    /// Uses the given backend with the default storage key.
    pub fn with_backend(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    /// Stores the list under a different key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Appends a new report, stamping its timestamp and marking it pending.
    ///
    /// The whole list is rewritten in one backend write while holding the
    /// store lock, so concurrent appends never overwrite each other.
    pub fn append(&self, draft: ReportDraft) -> StoreResult<Report> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;

        let mut entries = self.load_entries()?;
        if entries.iter().any(|e| entry_id(e) == Some(draft.id.as_str())) {
            return Err(StoreError::DuplicateId(draft.id));
        }

        let report = draft.into_report(Utc::now());
        entries.push(report.to_json()?);
        self.save_entries(&entries)?;

        info!("Stored report {} ({} total)", report.id, entries.len());
        Ok(report)
    }

    /// Rewrites the sync status of one report, leaving every other field alone.
    ///
    /// `remote_id` is recorded when given; an existing remote id is kept otherwise.
    /// A report that is already synced is returned unchanged: `Synced` is final.
    pub fn update_sync_status(
        &self,
        id: &ReportId,
        status: SyncStatus,
        remote_id: Option<&RemoteId>,
    ) -> StoreResult<Report> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;

        let mut entries = self.load_entries()?;
        let entry = entries
            .iter_mut()
            .find(|e| entry_id(e) == Some(id.as_str()))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if entry_status(entry) == Some(SyncStatus::Synced) {
            debug!("Report {} is already synced, ignoring {}", id, status);
            return decode_entry(id, entry.clone());
        }

        let Value::Object(fields) = &mut *entry else {
            return Err(StoreError::Corrupted(format!("entry {id} is not an object")));
        };
        fields.insert("syncStatus".to_string(), serde_json::to_value(status)?);
        if let Some(remote_id) = remote_id {
            fields.insert("remoteId".to_string(), serde_json::to_value(remote_id)?);
        }

        let report = decode_entry(id, entry.clone())?;
        self.save_entries(&entries)?;

        debug!("Report {} is now {}", id, status);
        Ok(report)
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Returns every readable report, oldest first.
    ///
    /// Entries that fail to decode are logged and skipped.
    pub fn list(&self) -> StoreResult<Vec<Report>> {
        let entries = self.load_entries()?;
        let total = entries.len();

        let reports: Vec<Report> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match Report::from_json(entry) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("Skipping unreadable report at position {}: {}", index, e);
                    None
                }
            })
            .collect();

        if reports.len() < total {
            warn!("{} of {} stored reports could not be read", total - reports.len(), total);
        }
        Ok(reports)
    }

    /// Looks up one report by id.
    pub fn get(&self, id: &ReportId) -> StoreResult<Option<Report>> {
        Ok(self.list()?.into_iter().find(|r| &r.id == id))
    }

    /// Reports a retry sweep should push: pending or failed, oldest first.
    pub fn unsynced(&self) -> StoreResult<Vec<Report>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.sync_status.needs_sync())
            .collect())
    }

    /// Number of readable reports.
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    // ── Raw entries ──────────────────────────────────────────────

    /// Reads the raw list. Individual entries are not decoded here so that
    /// writes can carry damaged entries through unchanged.
    fn load_entries(&self) -> StoreResult<Vec<Value>> {
        let Some(bytes) = self.backend.get(&self.key)? else {
            return Ok(Vec::new());
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(other) => Err(StoreError::Corrupted(format!(
                "expected a list under {}, found {}",
                self.key,
                json_kind(&other)
            ))),
            Err(e) => Err(StoreError::Corrupted(format!(
                "value under {} is not JSON: {e}",
                self.key
            ))),
        }
    }

    fn save_entries(&self, entries: &[Value]) -> StoreResult<()> {
        let bytes = serde_json::to_vec(entries)?;
        self.backend.put(&self.key, &bytes)
    }
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

fn entry_status(entry: &Value) -> Option<SyncStatus> {
    entry.get("syncStatus")?.as_str()?.parse().ok()
}

fn decode_entry(id: &ReportId, entry: Value) -> StoreResult<Report> {
    Report::from_json(entry)
        .map_err(|e| StoreError::Corrupted(format!("entry {id} does not decode: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
