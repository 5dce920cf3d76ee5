//! Plain-text rendering of the session for the terminal.

use std::fmt::Write as _;

use leadgen_core::Lead;
use leadgen_pipeline::{BulkReport, SessionView};

const MAX_CELL: usize = 30;

/// An em dash for a missing value, otherwise the value cut to [`MAX_CELL`] chars.
fn cell(value: Option<&str>) -> String {
    match value {
        None => "\u{2014}".to_string(),
        Some(v) if v.chars().count() > MAX_CELL => {
            format!("{}...", v.chars().take(MAX_CELL).collect::<String>())
        }
        Some(v) => v.to_string(),
    }
}

fn row(lead: &Lead) -> String {
    format!(
        "{:<34}{:<34}{:<12}{:<18}{:<34}{:<34}{}",
        cell(Some(&lead.name)),
        cell(Some(&lead.address)),
        lead.status.as_str(),
        cell(lead.phone.as_deref()),
        cell(lead.email.as_deref()),
        cell(lead.website.as_deref()),
        cell(lead.owner.as_deref()),
    )
}

pub(crate) fn lead_table(view: &SessionView) -> String {
    let mut out = format!(
        "{:<34}{:<34}{:<12}{:<18}{:<34}{:<34}OWNER",
        "NAME", "ADDRESS", "STATUS", "PHONE", "EMAIL", "WEBSITE"
    );
    for lead in view.leads() {
        let _ = write!(out, "\n{}", row(lead));
        if let Some(note) = &lead.notes {
            let _ = write!(out, "\n    note: {note}");
        }
    }
    out
}

pub(crate) fn bulk_summary(report: &BulkReport) -> String {
    format!(
        "enriched {} leads in {} batches: {} completed, {} failed, {} skipped",
        report.completed + report.failed,
        report.batches(),
        report.completed,
        report.failed,
        report.skipped
    )
}
