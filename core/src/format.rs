//! Date helpers for mood entries.

use chrono::{Local, NaiveDate, NaiveDateTime};

const ENTRY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DISPLAY_FORMAT: &str = "%d %B %Y, %H:%M";

/// Wire representation of an entry timestamp (ISO local date-time, seconds precision).
pub fn entry_timestamp(at: NaiveDateTime) -> String {
    at.format(ENTRY_DATE_FORMAT).to_string()
}

/// The current local time as an entry timestamp.
pub fn now_entry_timestamp() -> String {
    entry_timestamp(Local::now().naive_local())
}

/// `2024-05-01T09:30:00` becomes `01 May 2024, 09:30`. Anything that does
/// not parse as an ISO local date-time is returned unchanged.
pub fn format_entry_date(iso: &str) -> String {
    match iso.parse::<NaiveDateTime>() {
        Ok(at) => at.format(DISPLAY_FORMAT).to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Whether an entry's `entryDate` falls on `day`.
pub fn is_on_day(entry_date: &str, day: NaiveDate) -> bool {
    entry_date.starts_with(&day.format("%Y-%m-%d").to_string())
}
