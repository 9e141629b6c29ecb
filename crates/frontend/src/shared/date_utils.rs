//! Utilities for date and time formatting
//!
//! Server timestamps arrive as ISO-8601 strings, with or without an offset.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const LONG_FORMAT: &str = "%-d %B %Y, %H:%M";
const SHORT_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a server timestamp into local wall-clock time.
///
/// Values carrying an offset are converted to the browser's zone; naive
/// values are taken as already local.
fn parse_local(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Long date with time, e.g. "2024-01-15T14:30:00" -> "15 January 2024, 14:30"
pub fn format_long_datetime(value: &str) -> String {
    parse_local(value)
        .map(|dt| dt.format(LONG_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Compact form for table cells, e.g. "2024-01-15T14:30:00" -> "2024-01-15 14:30"
pub fn format_short_datetime(value: &str) -> String {
    parse_local(value)
        .map(|dt| dt.format(SHORT_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}
