//! Datetime helpers for bhub.
//!
//! Timestamps are stored as `YYYY-MM-DD HH:MM:SS` UTC strings, which keeps
//! them lexicographically comparable in SQL across backends.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Storage format for timestamps.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a datetime into the storage representation.
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Current time in the storage representation.
pub fn now_storage() -> String {
    to_storage(&Utc::now())
}

/// Compute the storage-format cutoff for "now minus the given number of days".
pub fn cutoff_days_ago(days: i64) -> String {
    to_storage(&(Utc::now() - Duration::days(days)))
}

/// Parse a stored timestamp back into a `DateTime<Utc>`.
///
/// Accepts the storage format and RFC 3339 (older rows and external data).
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, STORAGE_FORMAT) {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a stored timestamp as RFC 3339 for API responses.
///
/// Returns the input unchanged when it cannot be parsed.
pub fn to_rfc3339(s: &str) -> String {
    match parse_datetime(s) {
        Some(dt) => dt.to_rfc3339(),
        None => s.to_string(),
    }
}
