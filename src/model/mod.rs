//! Row model for schemaless table-store records.
//!
//! A [`TableRow`] is an ordered mapping from column name to an arbitrary
//! JSON value, with two mandatory identity fields (partition key and row
//! key) that together form the composite key, and an optional
//! server-assigned modification timestamp.
//!
//! The store is schemaless: rows in one table may have entirely different
//! shapes, so the displayed column set is derived as the union of keys
//! across all fetched rows.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TabgazeError};

/// Column name of the partition identifier.
pub const PARTITION_KEY: &str = "partitionKey";

/// Column name of the row identifier.
pub const ROW_KEY: &str = "rowKey";

/// Column name of the server-assigned modification marker.
pub const TIMESTAMP: &str = "timestamp";

/// System columns in their fixed display order.
pub const SYSTEM_COLUMNS: [&str; 3] = [PARTITION_KEY, ROW_KEY, TIMESTAMP];

/// One record in the external table store.
///
/// Backed by an insertion-ordered JSON map (`preserve_order`), so a row
/// serializes back out with the same field order it arrived with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    values: Map<String, Value>,
}

impl TableRow {
    /// Create a row from its identity fields.
    #[must_use]
    pub fn new(partition: impl Into<String>, row_key: impl Into<String>) -> Self {
        let mut values = Map::new();
        values.insert(PARTITION_KEY.to_string(), Value::String(partition.into()));
        values.insert(ROW_KEY.to_string(), Value::String(row_key.into()));
        Self { values }
    }

    /// Build a row from a raw vendor map, normalizing identity fields.
    ///
    /// Both identity fields must be present as strings. A date-typed
    /// modification marker (RFC 3339 parseable string) is normalized to
    /// millisecond-precision ISO-8601 UTC.
    pub fn from_values(values: Map<String, Value>) -> Result<Self> {
        let mut row = Self { values };
        for field in [PARTITION_KEY, ROW_KEY] {
            if row.string_field(field).is_none() {
                return Err(TabgazeError::MissingIdentityField {
                    field: field.to_string(),
                });
            }
        }
        row.normalize_timestamp();
        Ok(row)
    }

    /// Partition identifier.
    ///
    /// # Panics
    ///
    /// Never panics for rows built through [`TableRow::new`] or
    /// [`TableRow::from_values`], which both guarantee the field exists.
    #[must_use]
    pub fn partition_key(&self) -> &str {
        self.string_field(PARTITION_KEY)
            .expect("partitionKey is validated at construction")
    }

    /// Row identifier.
    #[must_use]
    pub fn row_key(&self) -> &str {
        self.string_field(ROW_KEY)
            .expect("rowKey is validated at construction")
    }

    /// Server-assigned modification marker, if present.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.string_field(TIMESTAMP)
    }

    /// Composite key `(partition, row_key)`, unique within a table snapshot.
    #[must_use]
    pub fn composite_key(&self) -> (&str, &str) {
        (self.partition_key(), self.row_key())
    }

    /// Value of a column, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Set the value of a column.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Remove a column. With full-replace upsert semantics, a removed
    /// field is actually cleared remotely on the next save.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    /// Iterate over column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The underlying ordered map.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    fn string_field(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    /// Rewrite a parseable date marker to millisecond ISO-8601 UTC.
    fn normalize_timestamp(&mut self) {
        let Some(raw) = self.string_field(TIMESTAMP) else {
            return;
        };
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            let iso = parsed
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true);
            self.values.insert(TIMESTAMP.to_string(), Value::String(iso));
        }
    }
}

/// Derive the displayed column set for a collection of rows.
///
/// The union of all keys across all rows, with the system columns first
/// (partition key, row key, timestamp — in that fixed order, when present)
/// followed by the remaining columns in lexicographic order. The result is
/// deterministic and independent of row fetch order.
#[must_use]
pub fn derive_columns(rows: &[TableRow]) -> Vec<String> {
    let mut rest: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
    let mut seen_system = [false; 3];

    for row in rows {
        for column in row.columns() {
            match SYSTEM_COLUMNS.iter().position(|c| *c == column) {
                Some(i) => seen_system[i] = true,
                None => {
                    rest.insert(column);
                }
            }
        }
    }

    let mut columns: Vec<String> = SYSTEM_COLUMNS
        .iter()
        .zip(seen_system)
        .filter(|(_, seen)| *seen)
        .map(|(c, _)| (*c).to_string())
        .collect();
    columns.extend(rest.into_iter().map(String::from));
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> TableRow {
        let mut values = Map::new();
        for (k, v) in pairs {
            values.insert((*k).to_string(), v.clone());
        }
        TableRow::from_values(values).unwrap()
    }

    #[test]
    fn test_identity_fields_required() {
        let mut values = Map::new();
        values.insert(PARTITION_KEY.to_string(), json!("p1"));

        let err = TableRow::from_values(values).unwrap_err();
        assert!(matches!(
            err,
            TabgazeError::MissingIdentityField { field } if field == ROW_KEY
        ));
    }

    #[test]
    fn test_composite_key() {
        let r = TableRow::new("users", "alice");
        assert_eq!(r.composite_key(), ("users", "alice"));
    }

    #[test]
    fn test_timestamp_normalized_to_utc_millis() {
        let r = row(&[
            (PARTITION_KEY, json!("p")),
            (ROW_KEY, json!("r")),
            (TIMESTAMP, json!("2023-11-14T23:13:20.5+01:00")),
        ]);
        assert_eq!(r.timestamp(), Some("2023-11-14T22:13:20.500Z"));
    }

    #[test]
    fn test_unparseable_timestamp_left_alone() {
        let r = row(&[
            (PARTITION_KEY, json!("p")),
            (ROW_KEY, json!("r")),
            (TIMESTAMP, json!("not a date")),
        ]);
        assert_eq!(r.timestamp(), Some("not a date"));
    }

    #[test]
    fn test_derive_columns_system_first_then_lexicographic() {
        let rows = vec![
            row(&[
                (ROW_KEY, json!("r1")),
                (PARTITION_KEY, json!("p")),
                ("zeta", json!(1)),
            ]),
            row(&[
                (PARTITION_KEY, json!("p")),
                (ROW_KEY, json!("r2")),
                ("alpha", json!(2)),
                (TIMESTAMP, json!("2024-01-01T00:00:00Z")),
            ]),
        ];

        assert_eq!(
            derive_columns(&rows),
            vec![PARTITION_KEY, ROW_KEY, TIMESTAMP, "alpha", "zeta"]
        );
    }

    #[test]
    fn test_derive_columns_independent_of_fetch_order() {
        let a = row(&[(PARTITION_KEY, json!("p")), (ROW_KEY, json!("1")), ("b", json!(1))]);
        let b = row(&[(PARTITION_KEY, json!("p")), (ROW_KEY, json!("2")), ("a", json!(1))]);

        let forward = derive_columns(&[a.clone(), b.clone()]);
        let reverse = derive_columns(&[b, a]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_remove_clears_field() {
        let mut r = row(&[
            (PARTITION_KEY, json!("p")),
            (ROW_KEY, json!("r")),
            ("note", json!("hi")),
        ]);
        r.remove("note");
        assert_eq!(r.get("note"), None);
    }
}
