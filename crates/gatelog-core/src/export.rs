//! CSV export of the event log.
//!
//! Reporting collaborators consume the log as paired visits: each ENTRY is
//! matched with the following EXIT for the same student, a dangling ENTRY
//! shows as an `Active` visit, and an EXIT without a matching ENTRY is
//! skipped. Times are rendered in UTC.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::events::{LogEvent, ScanAction};

/// CSV header row.
const HEADER: [&str; 8] = [
    "Enrollment",
    "Student Name",
    "Sem",
    "Dept",
    "Date",
    "Entry Time",
    "Exit Time",
    "Total Duration",
];

/// One exported visit row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VisitRow {
    enrollment: String,
    name: String,
    semester: u8,
    department: String,
    date: String,
    entry_time: String,
    exit_time: String,
    duration: String,
}

impl VisitRow {
    fn open(entry: &LogEvent) -> Self {
        Self {
            enrollment: entry.enrollment_number.clone(),
            name: entry.name.clone(),
            semester: entry.semester,
            department: entry.department.clone(),
            date: format_date(entry.timestamp),
            entry_time: format_time(entry.timestamp),
            exit_time: "Active".to_string(),
            duration: String::new(),
        }
    }

    fn closed(entry: &LogEvent, exit: &LogEvent) -> Self {
        Self {
            exit_time: format_time(exit.timestamp),
            duration: format_duration(exit.timestamp - entry.timestamp),
            ..Self::open(entry)
        }
    }
}

/// Render the given events as visit-paired CSV.
///
/// Events may arrive in any order; they are grouped per student and paired
/// chronologically before rendering.
///
/// # Errors
///
/// Returns [`Error::PersistenceError`] if CSV serialization fails.
pub fn export_csv(events: &[LogEvent]) -> Result<String> {
    let mut sorted: Vec<&LogEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.enrollment_number
            .cmp(&b.enrollment_number)
            .then(a.timestamp.cmp(&b.timestamp))
    });

    let mut rows: Vec<VisitRow> = Vec::new();
    let mut pending: Option<&LogEvent> = None;
    let mut current_key: Option<&str> = None;

    for event in sorted {
        if current_key != Some(event.enrollment_number.as_str()) {
            if let Some(entry) = pending.take() {
                rows.push(VisitRow::open(entry));
            }
            current_key = Some(event.enrollment_number.as_str());
        }
        match event.action {
            ScanAction::Entry => {
                if let Some(entry) = pending.replace(event) {
                    // Previous entry never saw an exit
                    rows.push(VisitRow::open(entry));
                }
            }
            ScanAction::Exit => {
                if let Some(entry) = pending.take() {
                    rows.push(VisitRow::closed(entry, event));
                }
                // An exit without a prior entry is dropped
            }
        }
    }
    if let Some(entry) = pending.take() {
        rows.push(VisitRow::open(entry));
    }

    write_rows(&rows)
}

// The header line is plain while every data field is quoted, matching the
// files the reporting tooling already ingests.
fn write_rows(rows: &[VisitRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record([
                row.enrollment.as_str(),
                row.name.as_str(),
                &row.semester.to_string(),
                row.department.as_str(),
                row.date.as_str(),
                row.entry_time.as_str(),
                row.exit_time.as_str(),
                row.duration.as_str(),
            ])
            .map_err(|e| Error::PersistenceError(format!("write csv row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::PersistenceError(format!("flush csv: {e}")))?;
    let body =
        String::from_utf8(bytes).map_err(|e| Error::PersistenceError(format!("encode csv: {e}")))?;
    Ok(format!("{}\n{body}", HEADER.join(",")))
}

fn to_datetime(timestamp_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp_ms).unwrap_or(DateTime::UNIX_EPOCH)
}

fn format_date(timestamp_ms: i64) -> String {
    to_datetime(timestamp_ms).format("%d/%m/%Y").to_string()
}

fn format_time(timestamp_ms: i64) -> String {
    to_datetime(timestamp_ms).format("%H:%M:%S").to_string()
}

fn format_duration(duration_ms: i64) -> String {
    let minutes = duration_ms.max(0) / 60_000;
    format!("{}h {}m", minutes / 60, minutes % 60)
}
