//! In-memory table store.
//!
//! Backs demo mode and most tests. Behaves like a real store boundary:
//! filter expressions go through the shared grammar, upserts are
//! full-replace, and deletes can be poisoned per composite key so tests
//! can exercise partial bulk-delete failures.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use serde_json::json;

use crate::error::{Result, TabgazeError};
use crate::model::TableRow;

use super::filter::{parse_filter, row_matches};
use super::TableStore;

/// In-memory tables, keyed by table name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, Vec<TableRow>>>,
    poisoned_deletes: Mutex<HashSet<(String, String)>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with initial rows (builder style).
    #[must_use]
    pub fn with_table(self, name: impl Into<String>, rows: Vec<TableRow>) -> Self {
        self.tables
            .lock()
            .expect("memory store lock")
            .insert(name.into(), rows);
        self
    }

    /// Make future deletes of this composite key fail.
    pub fn poison_delete(&self, partition: impl Into<String>, row_key: impl Into<String>) {
        self.poisoned_deletes
            .lock()
            .expect("memory store lock")
            .insert((partition.into(), row_key.into()));
    }

    /// A store seeded with rows that exercise every content kind.
    #[must_use]
    pub fn demo() -> Self {
        let mut users = Vec::new();
        for (i, (name, city)) in [("alice", "berlin"), ("bob", "paris"), ("carol", "lima")]
            .iter()
            .enumerate()
        {
            let mut row = TableRow::new("users", format!("u{:03}", i + 1));
            row.set("name", json!(name));
            row.set("city", json!(city));
            row.set("score", json!(format!("{}", (i + 1) * 7)));
            row.set("createdAt", json!(1_700_000_000_000_i64 + i as i64 * 86_400_000));
            row.set(
                "profile",
                json!({"plan": "pro", "quota": 100 * (i + 1), "beta": i == 0}),
            );
            users.push(row);
        }

        let mut events = Vec::new();
        let mut e1 = TableRow::new("events", "e001");
        e1.set("kind", json!("export"));
        e1.set("payload", json!("{\"rows\": 42, \"format\": \"csv\"}"));
        e1.set("updated_at", json!(1_700_100_000));
        events.push(e1);
        let mut e2 = TableRow::new("events", "e002");
        e2.set("kind", json!("import"));
        e2.set("report", json!("file,rows,errors\na.csv,100,0\nb.csv,25,2"));
        e2.set(
            "notes",
            json!("Import ran to completion after two retries; the second batch was throttled by the gateway and resumed from the last committed page marker without data loss."),
        );
        events.push(e2);

        Self::new()
            .with_table("users", users)
            .with_table("events", events)
            .with_table("empty", Vec::new())
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut BTreeMap<String, Vec<TableRow>>) -> T) -> T {
        f(&mut self.tables.lock().expect("memory store lock"))
    }
}

impl TableStore for MemoryStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.with_tables(|tables| tables.keys().cloned().collect()))
    }

    async fn list_rows(&self, table: &str, filter: Option<&str>) -> Result<Vec<TableRow>> {
        let clauses = match filter {
            Some(expr) => parse_filter(expr)?,
            None => Vec::new(),
        };

        self.with_tables(|tables| {
            let rows = tables.get(table).ok_or_else(|| TabgazeError::TableNotFound {
                table: table.to_string(),
            })?;
            Ok(rows
                .iter()
                .filter(|r| row_matches(r, &clauses))
                .cloned()
                .collect())
        })
    }

    async fn upsert_row(&self, table: &str, row: &TableRow) -> Result<()> {
        self.with_tables(|tables| {
            // First upsert into a new table creates it.
            let rows = tables.entry(table.to_string()).or_default();

            // Full replace: the stored row becomes exactly `row`.
            match rows
                .iter_mut()
                .find(|r| r.composite_key() == row.composite_key())
            {
                Some(existing) => *existing = row.clone(),
                None => rows.push(row.clone()),
            }
            Ok(())
        })
    }

    async fn delete_row(&self, table: &str, partition: &str, row_key: &str) -> Result<()> {
        let poisoned = self
            .poisoned_deletes
            .lock()
            .expect("memory store lock")
            .contains(&(partition.to_string(), row_key.to_string()));
        if poisoned {
            return Err(TabgazeError::delete(
                partition,
                row_key,
                "simulated backend failure",
            ));
        }

        self.with_tables(|tables| {
            let rows = tables.get_mut(table).ok_or_else(|| TabgazeError::TableNotFound {
                table: table.to_string(),
            })?;

            let before = rows.len();
            rows.retain(|r| r.composite_key() != (partition, row_key));
            if rows.len() == before {
                return Err(TabgazeError::RowNotFound {
                    partition: partition.to_string(),
                    row_key: row_key.to_string(),
                });
            }
            Ok(())
        })
    }
}
