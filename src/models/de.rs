//! Lenient deserializers for backend fields
//!
//! The backend is not strict about identifier and timestamp encodings, so ids may
//! arrive as strings or numbers and dates in several textual shapes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

/// Accept a JSON string or integer and normalize it to a string identifier
pub fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}

/// Accept any timestamp shape understood by `parse_timestamp`, or epoch milliseconds
pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(raw) => parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
    }
}

/// Parse a timestamp string
///
/// Supported shapes:
/// - RFC 3339 (`2024-05-01T10:00:00Z`, `2024-05-01T10:00:00+02:00`)
/// - Naive date-time, space or `T` separated, optional fraction (treated as UTC)
/// - Plain date (`2024-05-01`, midnight UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Date label shown next to list entries
pub fn display_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.day(), 1);
    }

    #[test]
    fn test_parse_naive_forms() {
        let a = parse_timestamp("2024-05-01 10:30:00").unwrap();
        let b = parse_timestamp("2024-05-01T10:30:00.123456").unwrap();
        assert_eq!(a.minute(), 30);
        assert_eq!(b.minute(), 30);
        assert_eq!(a.date_naive(), b.date_naive());
    }

    #[test]
    fn test_parse_plain_date() {
        let ts = parse_timestamp(" 2023-12-31 ").unwrap();
        assert_eq!(ts.year(), 2023);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_display_date() {
        let ts = parse_timestamp("2024-02-09T23:59:59Z").unwrap();
        assert_eq!(display_date(&ts), "2024-02-09");
    }
}
