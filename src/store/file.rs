//! JSON-file snapshot backend.
//!
//! Persists all tables in one JSON document, `{ "table": [row, ...] }`.
//! Every mutation rewrites the file atomically, so a crash mid-save
//! leaves the previous snapshot intact. This is what powers the binary
//! without a network client.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::error::{Result, TabgazeError};
use crate::model::TableRow;
use crate::util::atomic_write;

use super::filter::{parse_filter, row_matches};
use super::TableStore;

type Tables = BTreeMap<String, Vec<TableRow>>;

/// Local-disk table store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl FileStore {
    /// Open an existing data file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(TabgazeError::DataFileNotFound { path });
        }
        let tables = Self::load(&path)?;
        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    /// Open a data file, creating an empty one when it does not exist.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            atomic_write(&path, b"{}")?;
        }
        Self::open(path)
    }

    fn load(path: &Path) -> Result<Tables> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TabgazeError::io(format!("Failed to read data file: {}", path.display()), e))?;

        let raw: BTreeMap<String, Vec<Map<String, Value>>> =
            serde_json::from_str(&content).map_err(|e| TabgazeError::SerializationError {
                context: format!("Invalid data file: {}", path.display()),
                source: e,
            })?;

        let mut tables = Tables::new();
        for (name, rows) in raw {
            let rows = rows
                .into_iter()
                .map(TableRow::from_values)
                .collect::<Result<Vec<_>>>()?;
            tables.insert(name, rows);
        }
        Ok(tables)
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let content = serde_json::to_vec_pretty(tables).map_err(|e| {
            TabgazeError::SerializationError {
                context: format!("Failed to serialize data file: {}", self.path.display()),
                source: e,
            }
        })?;
        atomic_write(&self.path, &content)
    }
}

impl TableStore for FileStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self
            .tables
            .lock()
            .expect("file store lock")
            .keys()
            .cloned()
            .collect())
    }

    async fn list_rows(&self, table: &str, filter: Option<&str>) -> Result<Vec<TableRow>> {
        let clauses = match filter {
            Some(expr) => parse_filter(expr)?,
            None => Vec::new(),
        };

        let tables = self.tables.lock().expect("file store lock");
        let rows = tables.get(table).ok_or_else(|| TabgazeError::TableNotFound {
            table: table.to_string(),
        })?;
        Ok(rows
            .iter()
            .filter(|r| row_matches(r, &clauses))
            .cloned()
            .collect())
    }

    async fn upsert_row(&self, table: &str, row: &TableRow) -> Result<()> {
        let mut tables = self.tables.lock().expect("file store lock");
        // First upsert into a new table creates it.
        let rows = tables.entry(table.to_string()).or_default();

        match rows
            .iter_mut()
            .find(|r| r.composite_key() == row.composite_key())
        {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        self.persist(&tables)
    }

    async fn delete_row(&self, table: &str, partition: &str, row_key: &str) -> Result<()> {
        let mut tables = self.tables.lock().expect("file store lock");
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
        self.persist(&tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("test runtime")
            .block_on(fut)
    }

    fn seeded_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("data.json");
        let content = json!({
            "users": [
                {"partitionKey": "users", "rowKey": "u1", "name": "alice"},
                {"partitionKey": "users", "rowKey": "u2", "name": "bob"}
            ]
        });
        std::fs::write(&path, content.to_string()).unwrap();
        path
    }

    #[test]
    fn test_open_missing_file_errors() {
        let err = FileStore::open("/nonexistent/data.json").unwrap_err();
        assert!(matches!(err, TabgazeError::DataFileNotFound { .. }));
    }

    #[test]
    fn test_open_or_create_makes_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open_or_create(dir.path().join("new.json")).unwrap();
        assert_eq!(run(store.list_tables()).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_file(&dir);

        let store = FileStore::open(&path).unwrap();
        let mut row = TableRow::new("users", "u3");
        row.set("name", json!("carol"));
        run(store.upsert_row("users", &row)).unwrap();
        drop(store);

        // A fresh open sees the persisted row.
        let reopened = FileStore::open(&path).unwrap();
        let rows = run(reopened.list_rows("users", None)).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_file(&dir);

        let store = FileStore::open(&path).unwrap();
        run(store.delete_row("users", "users", "u1")).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        let rows = run(reopened.list_rows("users", None)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_key(), "u2");
    }

    #[test]
    fn test_invalid_json_reports_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, TabgazeError::SerializationError { .. }));
    }
}
