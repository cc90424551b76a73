//! Shared pieces of the `keben` operator CLI: argument parsing, runtime
//! configuration and the command implementations.

mod commands;
mod render;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use keben_model::Report;
use keben_sync::{RemoteTable, RestTableConfig, SyncError, SyncResult};
use keben_types::RemoteId;
use std::path::PathBuf;

pub use commands::{list, read_input, resync, submit, sweep};
pub use render::{report_line, sort_for_display, validation_lines};

#[derive(Parser, Debug)]
#[command(name = "keben")]
#[command(about = "Record delivery reports locally and sync them to the remote table")]
pub struct Cli {
    /// Path to the local report database
    #[arg(long, env = "KEBEN_STORE", default_value = "keben-reports.db")]
    pub store: PathBuf,

    /// Remote project URL (reports stay local when unset)
    #[arg(long, env = "KEBEN_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Remote API key
    #[arg(long, env = "KEBEN_REMOTE_KEY", default_value = "", hide_env_values = true)]
    pub remote_key: String,

    /// Remote table name
    #[arg(long, env = "KEBEN_REMOTE_TABLE", default_value = "reports")]
    pub remote_table: String,

    /// Remote request timeout in seconds
    #[arg(long, env = "KEBEN_REMOTE_TIMEOUT", default_value = "15")]
    pub timeout_secs: u64,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Validate, save and sync a report read from a JSON file
    Submit {
        /// Report input as JSON
        file: PathBuf,
    },
    /// Print saved reports
    List {
        /// Show the most recent report first
        #[arg(long)]
        newest_first: bool,
    },
    /// Push one pending or failed report again
    Resync {
        /// Local report id
        id: String,
    },
    /// Push every pending or failed report
    Sweep,
}

impl Cli {
    /// Remote table settings, or `None` when no remote URL is configured.
    pub fn remote_config(&self) -> Option<RestTableConfig> {
        let base_url = self.remote_url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        Some(RestTableConfig {
            base_url: base_url.to_string(),
            api_key: self.remote_key.clone(),
            table: self.remote_table.clone(),
            timeout_secs: self.timeout_secs,
            ..RestTableConfig::default()
        })
    }
}

/// Stand-in remote used when no remote URL is configured.
///
/// Every push fails as retryable, so reports are kept as failed and can be
/// swept once a remote is set up.
pub struct UnconfiguredRemote;

#[async_trait]
impl RemoteTable for UnconfiguredRemote {
    fn provider_name(&self) -> &'static str {
        "unconfigured"
    }

    async fn push(&self, _report: &Report) -> SyncResult<RemoteId> {
        Err(SyncError::Network("no remote configured".to_string()))
    }
}
