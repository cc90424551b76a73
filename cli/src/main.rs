//! Keben delivery report CLI
//!
//! Saves delivery reports to a local database first, then pushes them to the
//! remote table. Reports whose push failed stay local until `resync` or
//! `sweep` succeeds.
//!
//! Usage:
//!   keben submit report.json
//!   keben list --newest-first
//!   keben sweep
//!
//! Settings come from flags, the environment, or a `.env` file.

use anyhow::{Context, Result};
use clap::Parser;
use keben_cli::{Cli, Command, UnconfiguredRemote};
use keben_storage::ReportStore;
use keben_sync::{RemoteTable, RestTable, SubmissionOrchestrator};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let store = ReportStore::open(&args.store)
        .with_context(|| format!("failed to open report store at {}", args.store.display()))?;
    let store = Arc::new(store);
    info!("Using report store {}", args.store.display());

    let remote: Arc<dyn RemoteTable> = match args.remote_config() {
        Some(config) => Arc::new(RestTable::new(config)?),
        None => {
            warn!("No remote URL configured; reports will be kept locally");
            Arc::new(UnconfiguredRemote)
        }
    };
    let orchestrator = SubmissionOrchestrator::new(store.clone(), remote);

    let mut out = std::io::stdout().lock();
    let ok = match args.command {
        Command::Submit { file } => {
            let input = keben_cli::read_input(&file)?;
            keben_cli::submit(&orchestrator, input, &mut out).await?
        }
        Command::List { newest_first } => {
            keben_cli::list(&store, newest_first, &mut out)?;
            true
        }
        Command::Resync { id } => keben_cli::resync(&orchestrator, &id, &mut out).await?,
        Command::Sweep => keben_cli::sweep(&orchestrator, &mut out).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
