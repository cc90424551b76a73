//! Local-first report store for Keben.
//!
//! Reports are kept as one JSON array under a fixed key in a key-value
//! backend, the same layout the web app used in browser local storage.
//!
//! # Architecture
//!
//! - [`KvBackend`] is the persistence medium: get/put of whole byte values.
//!   [`SqliteBackend`] is durable; [`MemoryBackend`] lives for the process.
//! - [`ReportStore`] owns the report list: append, list, status updates.
//!   Every write is a read-modify-write of the whole list under one lock and
//!   one backend `put`, so a crash never leaves a half-written list behind.
//! - Entries that fail to decode are skipped by reads and carried through
//!   untouched by writes.

mod backend;
mod error;
mod report_store;

pub use backend::{KvBackend, MemoryBackend, SqliteBackend};
pub use error::{StoreError, StoreResult};
pub use report_store::{ReportStore, DEFAULT_STORAGE_KEY};
