//! Day and week keys.
//!
//! Day keys are calendar dates in an explicit timezone, formatted
//! `YYYY-MM-DD`. Week keys are ISO weeks, formatted `YYYY-Www`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use pulse_types::DATE_KEY_FORMAT;

/// Calendar day of `instant` as seen in `tz`.
///
/// Examples (tz = Asia/Shanghai, UTC+8):
/// - 2026-01-15T15:59:59Z -> 2026-01-15
/// - 2026-01-15T16:00:00Z -> 2026-01-16
pub fn day_key(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Format a day as `YYYY-MM-DD`.
pub fn format_day_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// ISO week key for a day, e.g. "2026-W03".
pub fn week_key(date: NaiveDate) -> String {
    let iso_week = date.iso_week();
    format!("{}-W{:02}", iso_week.year(), iso_week.week())
}

/// Monday and Sunday of the ISO week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let monday = date - Duration::days(offset);
    (monday, monday + Duration::days(6))
}

/// Monday of the given ISO week, if it exists.
pub fn week_start(iso_year: i32, week: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)
}
