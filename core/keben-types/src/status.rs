//! Sync status of a locally stored report.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a stored report has reached the remote table.
///
/// Every report starts as `Pending` when it is appended. A push attempt moves
/// it to `Synced` or `Failed`; a later resync may move `Pending`/`Failed` to
/// `Synced`. Nothing moves a report out of `Synced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    /// Returns true if a retry sweep should pick this report up.
    #[must_use]
    pub const fn needs_sync(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }

    /// Lowercase name as stored on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}
