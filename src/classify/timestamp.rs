//! Unix-timestamp detection.
//!
//! Only columns whose names suggest a time value are considered, so a
//! 13-digit order number in a `count` column is never rewritten into a
//! date. The value itself must sit in the millisecond- or second-epoch
//! magnitude range and land on a plausible calendar year.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::Value;

/// Substrings that mark a column as timestamp-bearing.
const COLUMN_MARKERS: [&str; 6] = ["time", "date", "created", "updated", "modified", "timestamp"];

/// Millisecond-epoch magnitude range (13 digits).
const MILLIS_RANGE: std::ops::Range<f64> = 1e12..1e13;

/// Second-epoch magnitude range (10 digits).
const SECONDS_RANGE: std::ops::Range<f64> = 1e9..1e10;

/// Accepted calendar years (UTC); anything outside is rejected.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2000..=2100;

/// Whether a column name indicates a timestamp value.
///
/// Case-insensitive: any of the marker substrings, the exact name `at`,
/// or an `_at` suffix (as in `created_at`).
#[must_use]
pub fn is_timestamp_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    COLUMN_MARKERS.iter().any(|m| lower.contains(m)) || lower == "at" || lower.ends_with("_at")
}

/// Try to interpret a value as an epoch timestamp, yielding ISO-8601 UTC.
///
/// Returns `None` when the value is not numeric, not positive, outside
/// both epoch magnitude ranges, or resolves to a year outside
/// [2000, 2100].
#[must_use]
pub fn detect_timestamp(value: &Value) -> Option<String> {
    let n = numeric_value(value)?;
    if n <= 0.0 {
        return None;
    }

    let millis = if MILLIS_RANGE.contains(&n) {
        n as i64
    } else if SECONDS_RANGE.contains(&n) {
        (n as i64).checked_mul(1000)?
    } else {
        return None;
    };

    let instant: DateTime<Utc> = DateTime::from_timestamp_millis(millis)?;
    if !YEAR_RANGE.contains(&instant.year()) {
        return None;
    }

    Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_gate() {
        assert!(is_timestamp_column("createdAt"));
        assert!(is_timestamp_column("UpdatedDate"));
        assert!(is_timestamp_column("last_modified"));
        assert!(is_timestamp_column("at"));
        assert!(is_timestamp_column("expires_at"));
        assert!(is_timestamp_column("timestamp"));

        assert!(!is_timestamp_column("count"));
        assert!(!is_timestamp_column("format"));
        assert!(!is_timestamp_column("chat"));
        assert!(!is_timestamp_column("price"));
    }

    #[test]
    fn test_millisecond_epoch() {
        assert_eq!(
            detect_timestamp(&json!(1_700_000_000_000_i64)).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
    }

    #[test]
    fn test_second_epoch() {
        assert_eq!(
            detect_timestamp(&json!(1_700_000_000)).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
    }

    #[test]
    fn test_numeric_string() {
        assert_eq!(
            detect_timestamp(&json!("1700000000000")).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
    }

    #[test]
    fn test_out_of_magnitude_rejected() {
        assert_eq!(detect_timestamp(&json!(42)), None);
        assert_eq!(detect_timestamp(&json!(99_999_999_999_i64)), None);
    }

    #[test]
    fn test_implausible_year_rejected() {
        // 9999999999 seconds is the year 2286.
        assert_eq!(detect_timestamp(&json!(9_999_999_999_i64)), None);
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(detect_timestamp(&json!(-1_700_000_000)), None);
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(detect_timestamp(&json!("yesterday")), None);
        assert_eq!(detect_timestamp(&json!(true)), None);
    }
}
