//! iCalendar file export.
//!
//! Pure rendering of an [`EventRecord`] into a single-VEVENT document,
//! followed by a save into the configured export directory. The document
//! layout follows the legacy exporter byte for byte (including the
//! trailing `END:VCALENDAR;`), except that text values are escaped per
//! RFC 5545 section 3.3.11 so reserved characters no longer corrupt the
//! output.

use crate::error::AppResult;
use crate::record::EventRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// Which calendar application the file is destined for; only the
/// suggested file name differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Outlook,
    Generic,
}

impl ExportTarget {
    /// Suggested download file name
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportTarget::Outlook => "outlook-event.ics",
            ExportTarget::Generic => "event.ics",
        }
    }
}

/// Escape a text value per RFC 5545 section 3.3.11.
///
/// Backslash first, then the reserved separators; newlines become the
/// literal `\n` sequence.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Date-time stamp for DTSTART/DTEND: `<date>T<time>00`, with the date
/// prefix dropped when the record carries no date. Both parts are opaque
/// pass-through values.
fn stamp(date: Option<&str>, time: Option<&str>) -> String {
    let time = time.unwrap_or("");
    match date {
        Some(date) => format!("{}T{}00", date, time),
        None => format!("{}00", time),
    }
}

/// Render the calendar document for one record.
///
/// Idempotent: the same record always yields byte-identical output.
pub fn render(record: &EventRecord) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", escape_text(record.title.as_deref().unwrap_or(""))),
        format!(
            "DESCRIPTION:{}",
            escape_text(record.description.as_deref().unwrap_or(""))
        ),
        format!(
            "DTSTART:{}",
            stamp(record.date.as_deref(), record.start_time.as_deref())
        ),
        format!(
            "DTEND:{}",
            stamp(record.date.as_deref(), record.end_time.as_deref())
        ),
        "END:VEVENT".to_string(),
        "END:VCALENDAR;".to_string(),
    ];
    lines.join("\n")
}

/// Render and write the calendar file, returning its path.
///
/// An existing file is overwritten; nothing stays open afterwards.
pub async fn save(
    export_dir: &Path,
    target: ExportTarget,
    record: &EventRecord,
) -> AppResult<PathBuf> {
    let path = export_dir.join(target.file_name());
    let content = render(record);
    tokio::fs::write(&path, content.as_bytes()).await?;
    info!("Exported \"{}\" to {}", record.display_title(), path.display());
    Ok(path)
}
