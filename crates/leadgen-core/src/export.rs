//! CSV export of the lead collection.

use chrono::NaiveDate;

use crate::lead::Lead;

pub const CSV_MIME_TYPE: &str = "text/csv; charset=utf-8";

pub const CSV_HEADERS: [&str; 8] = [
    "Name",
    "Address",
    "Phone",
    "Email",
    "Website",
    "Owner/CEO",
    "Status",
    "Map URL",
];

/// Render leads as CSV: header row first, every field double-quoted,
/// embedded quotes doubled, `\n` between records.
///
/// An empty slice produces the header row only.
///
/// # Panics
///
/// Only if writing to the in-memory buffer fails.
#[must_use]
pub fn to_csv(leads: &[Lead]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .expect("in-memory CSV write");

    for lead in leads {
        writer
            .write_record([
                lead.name.as_str(),
                lead.address.as_str(),
                lead.phone.as_deref().unwrap_or_default(),
                lead.email.as_deref().unwrap_or_default(),
                lead.website.as_deref().unwrap_or_default(),
                lead.owner.as_deref().unwrap_or_default(),
                lead.status.as_str(),
                lead.source_url.as_deref().unwrap_or_default(),
            ])
            .expect("in-memory CSV write");
    }

    let bytes = writer.into_inner().expect("in-memory CSV flush");
    String::from_utf8(bytes).expect("CSV built from UTF-8 fields")
}

/// `leads_export_<YYYY-MM-DD>.csv`
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("leads_export_{}.csv", date.format("%Y-%m-%d"))
}
