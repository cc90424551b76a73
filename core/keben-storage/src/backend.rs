//! Key-value persistence backends.

use crate::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A byte store keyed by string. `put` replaces the whole value in one step.
pub trait KvBackend: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value atomically.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;
}

fn check_quota(quota: Option<usize>, value: &[u8]) -> StoreResult<()> {
    match quota {
        Some(limit) if value.len() > limit => Err(StoreError::WriteFailed(format!(
            "quota exceeded: {} of {} bytes",
            value.len(),
            limit
        ))),
        _ => Ok(()),
    }
}

/// In-process backend. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes whose value is larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Writes a raw value, bypassing the quota. Used to seed or damage data.
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) -> StoreResult<()> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.into());
        Ok(())
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        check_quota(self.quota, value)?;
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Durable backend: a single `kv` table in a SQLite file.
///
/// Each `put` is one upsert statement, so SQLite's journal guarantees the
/// previous value survives a crash mid-write.
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
    quota: Option<usize>,
}

impl SqliteBackend {
    /// Opens (or creates) a backend at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::ReadFailed(format!("failed to open {}: {e}", path.display()))
        })?;
        debug!("Opened report database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StoreError::ReadFailed(format!("failed to open in-memory database: {e}"))
        })?;
        Self::from_connection(conn)
    }

    /// Rejects writes whose value is larger than `bytes`.
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let backend = Self {
            conn: Arc::new(Mutex::new(conn)),
            quota: None,
        };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;

            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );
            ",
        )
        .map_err(|e| StoreError::WriteFailed(format!("failed to init schema: {e}")))?;
        Ok(())
    }
}

impl KvBackend for SqliteBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, Vec<u8>>(0)
        })
        .optional()
        .map_err(|e| StoreError::ReadFailed(format!("failed to read {key}: {e}")))
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        check_quota(self.quota, value)?;
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| StoreError::WriteFailed(format!("failed to write {key}: {e}")))?;
        Ok(())
    }
}
