//! `leadgen search`: discovery, optional enrichment, optional CSV export.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use leadgen_core::{export_filename, to_csv, LeadStatus};
use leadgen_pipeline::{Orchestrator, PipelineError, SearchParams, SessionView};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::render;

#[derive(Debug)]
pub(crate) struct SearchOptions {
    pub enrich_all: bool,
    pub retry_failed: bool,
    pub export: bool,
    pub out_dir: PathBuf,
}

/// Log status counts every time the orchestrator publishes a new view.
fn spawn_progress_logger(mut rx: watch::Receiver<SessionView>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let (total, enriching, completed, failed) = {
                let view = rx.borrow_and_update();
                (
                    view.leads().len(),
                    view.count_with_status(LeadStatus::Enriching),
                    view.count_with_status(LeadStatus::Completed),
                    view.count_with_status(LeadStatus::Failed),
                )
            };
            tracing::debug!(total, enriching, completed, failed, "session updated");
        }
    })
}

/// Run one search session end to end.
///
/// # Errors
///
/// Returns an error if the input is blank, discovery fails, or the export
/// file cannot be written. Individual enrichment failures are shown in the
/// table, not propagated.
pub(crate) async fn run_search(
    orchestrator: &Orchestrator,
    industry: &str,
    location: &str,
    options: &SearchOptions,
) -> anyhow::Result<()> {
    let params = SearchParams::new(industry, location)?;
    let progress = spawn_progress_logger(orchestrator.subscribe());

    let result = drive_session(orchestrator, &params, options).await;
    progress.abort();
    result
}

async fn drive_session(
    orchestrator: &Orchestrator,
    params: &SearchParams,
    options: &SearchOptions,
) -> anyhow::Result<()> {
    match orchestrator.search(params).await {
        Ok(count) => tracing::info!(count, "discovery finished"),
        Err(PipelineError::Discovery(e)) => {
            tracing::error!(error = %e, "discovery failed");
            let view = orchestrator.snapshot();
            if let Some(banner) = view.banner() {
                eprintln!("{banner}");
            }
            anyhow::bail!("search failed");
        }
        Err(e) => return Err(e.into()),
    }

    let view = orchestrator.snapshot();
    if let Some(banner) = view.banner() {
        println!("{banner}");
        return Ok(());
    }
    println!("{}", render::lead_table(&view));

    if options.enrich_all {
        let report = orchestrator.enrich_all().await?;
        println!();
        println!("{}", render::bulk_summary(&report));
    }

    if options.retry_failed {
        let failed: Vec<_> = orchestrator
            .snapshot()
            .leads()
            .iter()
            .filter(|l| l.status == LeadStatus::Failed)
            .map(|l| l.id)
            .collect();
        if !failed.is_empty() {
            println!("retrying {} failed leads", failed.len());
        }
        for id in failed {
            let outcome = orchestrator.retry(id).await;
            tracing::info!(lead_id = %id, ?outcome, "retry finished");
        }
    }

    if options.enrich_all || options.retry_failed {
        println!();
        println!("{}", render::lead_table(&orchestrator.snapshot()));
    }

    if options.export {
        let path = write_export(
            &orchestrator.snapshot(),
            &options.out_dir,
            Utc::now().date_naive(),
        )?;
        println!("exported to {}", path.display());
    }

    Ok(())
}

/// Write the current collection as CSV into `out_dir`.
///
/// # Errors
///
/// Returns an error if there is nothing to export or the file cannot be
/// written.
pub(crate) fn write_export(
    view: &SessionView,
    out_dir: &Path,
    date: NaiveDate,
) -> anyhow::Result<PathBuf> {
    if !view.controls().can_export {
        anyhow::bail!("nothing to export; the lead collection is empty");
    }
    let path = out_dir.join(export_filename(date));
    std::fs::write(&path, to_csv(view.leads()))
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(path)
}
