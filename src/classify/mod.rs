//! Content-type classification for cell values.
//!
//! Raw cell values arrive as arbitrary JSON scalars, objects, or arrays;
//! before display each one is classified as JSON, CSV, a Unix timestamp,
//! or plain text. Classification is a pure function of the value and (for
//! timestamp detection) the owning column name.
//!
//! Precedence is load-bearing: the rules run in a fixed order and the
//! first match wins, so ambiguity between JSON-looking and CSV-looking
//! text is resolved by priority rather than confidence scoring. The rules
//! live in an explicit ordered list ([`RULES`]) so the precedence is
//! auditable and each rule is unit-testable on its own.

mod csv;
mod timestamp;

pub use csv::{detect_csv, split_quoted};
pub use timestamp::{detect_timestamp, is_timestamp_column};

use serde_json::Value;

/// Placeholder shown for null/missing values.
pub const NULL_PLACEHOLDER: &str = "-";

/// Plain text longer than this becomes expandable.
pub const EXPAND_THRESHOLD: usize = 100;

/// Semantic content kind of a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Structured JSON (object or array).
    Json,
    /// Delimiter-separated tabular text.
    Csv,
    /// Unix epoch timestamp.
    Timestamp,
    /// Anything else.
    PlainText,
}

/// Parsed payload accompanying a classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON structure.
    Json(Value),
    /// Ordered rows of ordered string cells.
    Csv(Vec<Vec<String>>),
    /// ISO-8601 UTC instant.
    Timestamp(String),
    /// Raw text.
    Text(String),
}

/// Result of classifying one cell value.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// Detected content kind.
    pub kind: ContentKind,
    /// Whether the value can be opened in the inspection modal.
    pub expandable: bool,
    /// Short badge shown next to the cell, if any.
    pub label: Option<&'static str>,
    /// Parsed representation appropriate to the kind.
    pub payload: Payload,
    /// Inline display string for the cell.
    pub display: String,
}

/// One classification rule: a definitive result or "no match".
type Rule = fn(&Value, Option<&str>) -> Option<Classified>;

/// Ordered rule list; first match wins. Plain text is the fallback and
/// is not a rule.
const RULES: [Rule; 3] = [json_rule, timestamp_rule, csv_rule];

/// Classify a raw cell value.
///
/// `column` is the owning column name, consulted only by the timestamp
/// rule. Null values short-circuit to a literal dash placeholder and are
/// never matched by any other rule.
#[must_use]
pub fn classify(value: &Value, column: Option<&str>) -> Classified {
    if value.is_null() {
        return Classified {
            kind: ContentKind::PlainText,
            expandable: false,
            label: None,
            payload: Payload::Text(NULL_PLACEHOLDER.to_string()),
            display: NULL_PLACEHOLDER.to_string(),
        };
    }

    for rule in RULES {
        if let Some(classified) = rule(value, column) {
            return classified;
        }
    }

    plain_text(value)
}

/// Rule 1: structured JSON.
///
/// Matches objects/arrays directly, and strings whose trimmed form is
/// bracket-delimited and parses. Bracket-delimited text that fails to
/// parse is not an error; it falls through to the later rules.
fn json_rule(value: &Value, _column: Option<&str>) -> Option<Classified> {
    let parsed = match value {
        Value::Object(_) | Value::Array(_) => value.clone(),
        Value::String(s) => {
            let trimmed = s.trim();
            let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'));
            if !delimited {
                return None;
            }
            serde_json::from_str::<Value>(trimmed).ok()?
        }
        _ => return None,
    };

    let display = match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };

    Some(Classified {
        kind: ContentKind::Json,
        expandable: true,
        label: Some("JSON"),
        payload: Payload::Json(parsed),
        display,
    })
}

/// Rule 2: epoch timestamp, gated on the column name.
fn timestamp_rule(value: &Value, column: Option<&str>) -> Option<Classified> {
    if !column.is_some_and(is_timestamp_column) {
        return None;
    }
    let iso = detect_timestamp(value)?;

    Some(Classified {
        kind: ContentKind::Timestamp,
        expandable: false,
        label: Some("DATE"),
        display: iso.clone(),
        payload: Payload::Timestamp(iso),
    })
}

/// Rule 3: delimiter-separated text.
fn csv_rule(value: &Value, _column: Option<&str>) -> Option<Classified> {
    let Value::String(s) = value else {
        return None;
    };
    let rows = detect_csv(s)?;

    Some(Classified {
        kind: ContentKind::Csv,
        expandable: true,
        label: Some("CSV"),
        payload: Payload::Csv(rows),
        display: s.clone(),
    })
}

/// Fallback: plain text, expandable past the length threshold.
fn plain_text(value: &Value) -> Classified {
    let text = stringify(value);
    let expandable = text.chars().count() > EXPAND_THRESHOLD;

    Classified {
        kind: ContentKind::PlainText,
        expandable,
        label: expandable.then_some("TEXT"),
        display: text.clone(),
        payload: Payload::Text(text),
    }
}

/// String form of a scalar value (no added quoting for strings).
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_null_is_dash_placeholder() {
        let c = classify(&Value::Null, None);
        assert_eq!(c.kind, ContentKind::PlainText);
        assert_eq!(c.display, "-");
        assert!(!c.expandable);
        assert_eq!(c.label, None);
    }

    #[test]
    fn test_object_is_json() {
        let c = classify(&json!({"a": 1}), None);
        assert_eq!(c.kind, ContentKind::Json);
        assert_eq!(c.label, Some("JSON"));
        assert!(c.expandable);
        assert_eq!(c.payload, Payload::Json(json!({"a": 1})));
    }

    #[test]
    fn test_json_string_parsed() {
        let c = classify(&json!("  [1, 2, 3] "), None);
        assert_eq!(c.kind, ContentKind::Json);
        assert_eq!(c.payload, Payload::Json(json!([1, 2, 3])));
    }

    #[test]
    fn test_malformed_json_falls_through() {
        // Bracket-delimited but unparseable: not an error, just not JSON.
        let c = classify(&json!("{not json}"), None);
        assert_eq!(c.kind, ContentKind::PlainText);
    }

    #[test]
    fn test_json_beats_csv() {
        // A JSON array with commas must classify as JSON, not CSV.
        let c = classify(&json!("[1,2,3]"), None);
        assert_eq!(c.kind, ContentKind::Json);
    }

    #[test]
    fn test_timestamp_with_matching_column() {
        let c = classify(&json!(1_700_000_000_000_i64), Some("createdAt"));
        assert_eq!(c.kind, ContentKind::Timestamp);
        assert_eq!(c.display, "2023-11-14T22:13:20.000Z");
        assert_eq!(c.label, Some("DATE"));
        assert!(!c.expandable);
    }

    #[test]
    fn test_timestamp_column_gate_fails() {
        let c = classify(&json!(1_700_000_000_000_i64), Some("count"));
        assert_eq!(c.kind, ContentKind::PlainText);
        assert_eq!(c.display, "1700000000000");
    }

    #[test]
    fn test_timestamp_without_column() {
        let c = classify(&json!(1_700_000_000_000_i64), None);
        assert_eq!(c.kind, ContentKind::PlainText);
    }

    #[test]
    fn test_csv_block() {
        let c = classify(&json!("a,b,c\n1,2,3\n4,5,6"), None);
        assert_eq!(c.kind, ContentKind::Csv);
        assert_eq!(
            c.payload,
            Payload::Csv(vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["1".into(), "2".into(), "3".into()],
                vec!["4".into(), "5".into(), "6".into()],
            ])
        );
    }

    #[test]
    fn test_short_text_not_expandable() {
        let c = classify(&json!("hello"), None);
        assert_eq!(c.kind, ContentKind::PlainText);
        assert!(!c.expandable);
        assert_eq!(c.label, None);
    }

    #[test]
    fn test_long_text_expandable() {
        let long = "x".repeat(101);
        let c = classify(&json!(long), None);
        assert_eq!(c.kind, ContentKind::PlainText);
        assert!(c.expandable);
        assert_eq!(c.label, Some("TEXT"));
    }

    #[test]
    fn test_booleans_and_numbers_are_text() {
        assert_eq!(classify(&json!(true), None).kind, ContentKind::PlainText);
        assert_eq!(classify(&json!(42), None).kind, ContentKind::PlainText);
        assert_eq!(classify(&json!(42), None).display, "42");
    }

    #[test]
    fn test_classification_is_idempotent_for_json() {
        let c = classify(&json!("{\"a\": 1}"), None);
        let Payload::Json(parsed) = &c.payload else {
            panic!("expected JSON payload");
        };
        // Re-serializing the payload and classifying again yields JSON.
        let reserialized = Value::String(parsed.to_string());
        assert_eq!(classify(&reserialized, None).kind, ContentKind::Json);
    }
}
