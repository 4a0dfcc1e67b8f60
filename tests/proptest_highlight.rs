//! Property-based tests for the highlighter and the classifier.

use proptest::prelude::*;
use serde_json::{json, Value};

use tabgaze::classify::{classify, ContentKind};
use tabgaze::highlight::{highlight, pretty, TokenStyle};

/// Arbitrary JSON values up to a small depth.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        // Finite floats only; serde_json cannot represent NaN/inf.
        (-1e12f64..1e12f64).prop_map(|f| json!(f)),
        "[ -~]{0,20}".prop_map(Value::from),
        "\\PC{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_ ]{0,10}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Concatenating token texts always reproduces the pretty-printed
    /// source exactly, for any JSON value.
    #[test]
    fn highlight_roundtrip_exact(value in arb_json()) {
        let tokens = highlight(&value);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(rebuilt, pretty(&value));
    }

    /// Key tokens only appear for object keys, never for string values.
    #[test]
    fn key_tokens_parse_back_as_strings(value in arb_json()) {
        for token in highlight(&value) {
            if matches!(token.style, TokenStyle::Key | TokenStyle::Str) {
                let parsed: Value = serde_json::from_str(&token.text).unwrap();
                prop_assert!(parsed.is_string());
            }
        }
    }

    /// Classification never panics and is total over arbitrary values
    /// and column names.
    #[test]
    fn classify_is_total(value in arb_json(), column in "[a-zA-Z_]{0,16}") {
        let classified = classify(&value, Some(&column));
        // Null always maps to the placeholder, everything else keeps a
        // non-placeholder rendering of the value.
        if value.is_null() {
            prop_assert_eq!(classified.display.as_str(), "-");
        }
        let _ = classify(&value, None);
    }

    /// A JSON-encoded string cell always classifies as JSON regardless
    /// of column name, since structure outranks every other rule.
    #[test]
    fn embedded_json_wins(n in any::<i32>(), column in "[a-z]{1,12}") {
        let cell = Value::String(format!("{{\"n\": {n}}}"));
        let classified = classify(&cell, Some(&column));
        prop_assert_eq!(classified.kind, ContentKind::Json);
    }

    /// Epoch numbers in the supported ranges render as UTC instants when
    /// the column name suggests time.
    #[test]
    fn epoch_millis_format(millis in 1_000_000_000_000_i64..9_999_999_999_999) {
        let classified = classify(&json!(millis), Some("updatedAt"));
        if classified.kind == ContentKind::Timestamp {
            prop_assert!(classified.display.ends_with('Z'));
            prop_assert_eq!(classified.display.len(), "2023-11-14T22:13:20.000Z".len());
        }
    }
}
