//! Table-store boundary.
//!
//! The rest of the application only ever talks to the [`TableStore`]
//! trait: list tables, query rows with an opaque filter expression,
//! upsert with full-replace semantics, delete by composite key. Network
//! transport is out of scope; the crate ships two local backends (an
//! in-memory store and a JSON-file snapshot store) and library users can
//! plug in their own client.

pub mod credential;
pub mod file;
mod filter;
pub mod memory;
pub mod worker;

pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use worker::{BulkDeleteOutcome, StoreRequest, StoreResponse, StoreWorker};

use std::fmt;

use crate::error::Result;
use crate::model::TableRow;
use crate::util::redact_secrets;

/// Connection credential for a table store.
///
/// Treated as an opaque string by everything except the backend that
/// consumes it. `Debug` output redacts key material so a credential can
/// never leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    connection_string: String,
}

impl Credential {
    /// Wrap a raw connection string.
    #[must_use]
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    /// The raw connection string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.connection_string
    }

    /// Account name segment of the connection string, if present.
    #[must_use]
    pub fn account_name(&self) -> Option<&str> {
        self.connection_string
            .split(';')
            .find_map(|segment| segment.trim().strip_prefix("AccountName="))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("connection_string", &redact_secrets(&self.connection_string))
            .finish()
    }
}

/// Client interface to an external table store.
///
/// Implementations report failures through [`crate::error::TabgazeError`];
/// filter expressions are passed through unmodified and any syntax error
/// comes back as a store-reported query error.
///
/// Callers drive these futures from a single dedicated worker thread, so
/// no `Send` bound is imposed on implementations.
#[allow(async_fn_in_trait)]
pub trait TableStore {
    /// List the names of all available tables.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Fetch the rows of a table, optionally server-side filtered.
    async fn list_rows(&self, table: &str, filter: Option<&str>) -> Result<Vec<TableRow>>;

    /// Insert or fully replace a row.
    ///
    /// Full-replace semantics: fields absent from `row` are cleared
    /// remotely, not merged.
    async fn upsert_row(&self, table: &str, row: &TableRow) -> Result<()>;

    /// Delete a row by composite key.
    async fn delete_row(&self, table: &str, partition: &str, row_key: &str) -> Result<()>;
}

/// Concrete backend selected at startup.
#[derive(Debug)]
pub enum Backend {
    /// In-memory tables (demo mode, tests).
    Memory(MemoryStore),
    /// JSON-file snapshot on local disk.
    File(FileStore),
}

impl TableStore for Backend {
    async fn list_tables(&self) -> Result<Vec<String>> {
        match self {
            Self::Memory(s) => s.list_tables().await,
            Self::File(s) => s.list_tables().await,
        }
    }

    async fn list_rows(&self, table: &str, filter: Option<&str>) -> Result<Vec<TableRow>> {
        match self {
            Self::Memory(s) => s.list_rows(table, filter).await,
            Self::File(s) => s.list_rows(table, filter).await,
        }
    }

    async fn upsert_row(&self, table: &str, row: &TableRow) -> Result<()> {
        match self {
            Self::Memory(s) => s.upsert_row(table, row).await,
            Self::File(s) => s.upsert_row(table, row).await,
        }
    }

    async fn delete_row(&self, table: &str, partition: &str, row_key: &str) -> Result<()> {
        match self {
            Self::Memory(s) => s.delete_row(table, partition, row_key).await,
            Self::File(s) => s.delete_row(table, partition, row_key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_redacts_key() {
        let cred = Credential::new("AccountName=demo;AccountKey=s3cr3t==;TableEndpoint=https://x");
        let debug = format!("{cred:?}");
        assert!(debug.contains("AccountName=demo"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_account_name() {
        let cred = Credential::new("AccountName=demo;AccountKey=k");
        assert_eq!(cred.account_name(), Some("demo"));

        let cred = Credential::new("nothing useful");
        assert_eq!(cred.account_name(), None);
    }
}
