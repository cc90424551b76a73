use crate::render::{report_line, sort_for_display, validation_lines};
use anyhow::{Context, Result};
use keben_model::RawInput;
use keben_storage::ReportStore;
use keben_sync::{SubmissionError, SubmissionOrchestrator};
use keben_types::ReportId;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Reads raw report input from a JSON file.
pub fn read_input(path: &Path) -> Result<RawInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid report JSON", path.display()))
}

/// Submits one report. Returns `false` when the input was invalid.
///
/// A failed push still counts as success: the report is saved.
pub async fn submit(
    orchestrator: &SubmissionOrchestrator,
    input: RawInput,
    out: &mut impl Write,
) -> Result<bool> {
    match orchestrator.submit(input).await {
        Ok(outcome) => {
            writeln!(out, "{}", outcome.message())?;
            writeln!(out, "{}", report_line(&outcome.report))?;
            Ok(true)
        }
        Err(SubmissionError::Validation(errors)) => {
            writeln!(out, "report not saved, {} invalid field(s):", errors.len())?;
            for line in validation_lines(&errors) {
                writeln!(out, "{line}")?;
            }
            Ok(false)
        }
        Err(SubmissionError::Store(e)) => Err(e).context("report not saved"),
    }
}

/// Prints every saved report.
pub fn list(store: &ReportStore, newest_first: bool, out: &mut impl Write) -> Result<()> {
    let reports = store.list().context("failed to read saved reports")?;
    if reports.is_empty() {
        writeln!(out, "no reports saved")?;
        return Ok(());
    }

    debug!("Listing {} reports", reports.len());
    for report in sort_for_display(reports, newest_first) {
        writeln!(out, "{}", report_line(&report))?;
    }
    Ok(())
}

/// Pushes one report again. Returns whether it is now synced.
pub async fn resync(
    orchestrator: &SubmissionOrchestrator,
    id: &str,
    out: &mut impl Write,
) -> Result<bool> {
    let id = ReportId::parse(id)?;
    let outcome = orchestrator
        .resync(&id)
        .await
        .with_context(|| format!("failed to resync {id}"))?;
    writeln!(out, "{}", outcome.message())?;
    Ok(outcome.remote.is_synced())
}

/// Pushes every unsynced report. Returns whether all of them synced.
pub async fn sweep(orchestrator: &SubmissionOrchestrator, out: &mut impl Write) -> Result<bool> {
    let summary = orchestrator.sweep().await.context("sweep failed")?;
    writeln!(
        out,
        "pushed {} report(s): {} synced, {} failed",
        summary.attempted, summary.synced, summary.failed
    )?;
    Ok(summary.failed == 0)
}
