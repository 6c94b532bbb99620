use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Parses a `YYYY-MM-DD` string into a real calendar date.
///
/// The components are re-validated through `from_ymd_opt`, which refuses
/// impossible dates like February 30th instead of rolling them over.
pub fn calendar_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
        return None;
    }
    if !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses an ISO 8601 date-time. A bare date is not accepted; the literal
/// `T` separator is required.
pub fn iso_datetime(s: &str) -> Option<DateTime<Utc>> {
    if !s.contains('T') {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offset-less timestamps are taken as UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

pub fn as_non_negative_int(v: &Value) -> Option<i64> {
    v.as_i64().filter(|n| *n >= 0)
}
