// file: src/parser/timestamp.rs
// description: lenient date-time parsing for the datetime column
// reference: https://docs.rs/chrono

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parses RFC 3339, RFC 2822 and a handful of common naive layouts. Naive values are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return Some(parsed.and_time(NaiveTime::MIN).and_utc());
        }
    }

    None
}

/// Blank or unparseable values resolve to `fallback`.
pub fn resolve_timestamp(raw: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or(fallback)
}
