//! Follow-up date interpretation.
//!
//! Attempts run in a fixed order and the first valid calendar instant wins:
//! ISO/RFC text, then `day/month/year`, then `month/day/year`, then an epoch
//! millisecond timestamp. Ambiguous values such as `03/04/2024` therefore
//! resolve day-first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    parse_iso(value)
        .or_else(|| parse_day_month_year(value))
        .or_else(|| parse_month_day_year(value))
        .or_else(|| parse_epoch_millis(value))
}

/// Minute-precision ISO rendering used for normalized follow-up dates.
pub fn format_minute(value: &NaiveDateTime) -> String {
    value.format(MINUTE_FORMAT).to_string()
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.naive_local());
    }
    for fmt in ISO_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn split_parts(value: &str) -> Option<[i64; 3]> {
    let parts = value.split(['/', '-']).collect::<Vec<_>>();
    if parts.len() != 3 {
        return None;
    }
    let mut numbers = [0i64; 3];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        *slot = part.trim().parse().ok()?;
    }
    Some(numbers)
}

fn calendar_midnight(year: i64, month: i64, day: i64) -> Option<NaiveDateTime> {
    let year = i32::try_from(year).ok()?;
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn parse_day_month_year(value: &str) -> Option<NaiveDateTime> {
    let [day, month, year] = split_parts(value)?;
    calendar_midnight(year, month, day)
}

fn parse_month_day_year(value: &str) -> Option<NaiveDateTime> {
    let [month, day, year] = split_parts(value)?;
    calendar_midnight(year, month, day)
}

fn parse_epoch_millis(value: &str) -> Option<NaiveDateTime> {
    let millis: i64 = value.parse().ok()?;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}
