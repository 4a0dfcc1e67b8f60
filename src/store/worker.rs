//! Background worker driving store calls.
//!
//! The TUI never blocks on the store: it submits a [`StoreRequest`] and
//! carries on; the worker thread drives the async store call on its own
//! current-thread tokio runtime and delivers a [`StoreResponse`] back
//! through the caller-supplied channel (wrapped into the caller's event
//! type). At most one request is in flight at a time from the worker's
//! perspective — requests queue in submission order.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::error::{Result, TabgazeError};
use crate::model::TableRow;
use crate::view::Generation;

use super::TableStore;

/// A request submitted to the store worker.
#[derive(Debug)]
pub enum StoreRequest {
    /// List all table names.
    ListTables,
    /// Fetch rows, tagged with the issuing fetch generation.
    FetchRows {
        /// Table to fetch from.
        table: String,
        /// Opaque server-side filter expression.
        filter: Option<String>,
        /// Generation current when this fetch was issued.
        generation: Generation,
    },
    /// Insert or fully replace a row.
    SaveRow {
        /// Target table.
        table: String,
        /// Row to write.
        row: TableRow,
    },
    /// Delete rows sequentially, aborting on the first failure.
    DeleteRows {
        /// Target table.
        table: String,
        /// Composite keys, in deletion order.
        keys: Vec<(String, String)>,
    },
    /// Stop the worker thread.
    Shutdown,
}

/// Result of a completed store request.
#[derive(Debug)]
pub enum StoreResponse {
    /// Table listing finished.
    Tables(Result<Vec<String>>),
    /// Row fetch finished.
    Rows {
        /// Table the rows belong to.
        table: String,
        /// Generation the fetch was issued under.
        generation: Generation,
        /// Fetched rows or the failure.
        result: Result<Vec<TableRow>>,
    },
    /// Save finished. On success the caller swaps `row` into local state.
    Saved {
        /// Target table.
        table: String,
        /// The row that was written.
        row: TableRow,
        /// Success or the failure.
        result: Result<()>,
    },
    /// Bulk delete finished (possibly partially).
    Deleted {
        /// Target table.
        table: String,
        /// Which keys were deleted and what, if anything, failed.
        outcome: BulkDeleteOutcome,
    },
}

/// Outcome of a sequential bulk delete.
///
/// There is no all-or-nothing guarantee: keys in `deleted` are gone
/// remotely even when `failed` is set, and keys after the failure were
/// never attempted.
#[derive(Debug)]
pub struct BulkDeleteOutcome {
    /// Keys deleted before any failure.
    pub deleted: Vec<(String, String)>,
    /// The first failure, if one occurred.
    pub failed: Option<FailedDelete>,
}

/// The delete call that aborted a bulk delete.
#[derive(Debug)]
pub struct FailedDelete {
    /// Composite key of the failed delete.
    pub key: (String, String),
    /// The store-reported error.
    pub error: TabgazeError,
}

/// Handle to the store worker thread.
pub struct StoreWorker {
    tx: mpsc::Sender<StoreRequest>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWorker {
    /// Spawn a worker owning `store`.
    ///
    /// Responses are wrapped via `wrap` and sent on `out`; the worker
    /// stops when `out` is closed or a shutdown request arrives.
    pub fn spawn<S, T, F>(store: S, out: mpsc::Sender<T>, wrap: F) -> Self
    where
        S: TableStore + Send + 'static,
        T: Send + 'static,
        F: Fn(StoreResponse) -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<StoreRequest>();

        let handle = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("failed to build store worker runtime: {e}");
                    return;
                }
            };

            while let Ok(request) = rx.recv() {
                if matches!(request, StoreRequest::Shutdown) {
                    break;
                }
                debug!(?request, "store worker handling request");
                let response = runtime.block_on(handle_request(&store, request));
                if out.send(wrap(response)).is_err() {
                    break;
                }
            }
        });

        Self {
            tx,
            handle: Some(handle),
        }
    }

    /// Queue a request for the worker.
    pub fn submit(&self, request: StoreRequest) -> Result<()> {
        self.tx
            .send(request)
            .map_err(|_| TabgazeError::WorkerDisconnected)
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(StoreRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

async fn handle_request<S: TableStore>(store: &S, request: StoreRequest) -> StoreResponse {
    match request {
        StoreRequest::ListTables => StoreResponse::Tables(store.list_tables().await),
        StoreRequest::FetchRows {
            table,
            filter,
            generation,
        } => {
            let result = store.list_rows(&table, filter.as_deref()).await;
            StoreResponse::Rows {
                table,
                generation,
                result,
            }
        }
        StoreRequest::SaveRow { table, row } => {
            let result = store.upsert_row(&table, &row).await;
            StoreResponse::Saved { table, row, result }
        }
        StoreRequest::DeleteRows { table, keys } => {
            let mut deleted = Vec::new();
            let mut failed = None;

            for (partition, row_key) in keys {
                match store.delete_row(&table, &partition, &row_key).await {
                    Ok(()) => deleted.push((partition, row_key)),
                    Err(error) => {
                        // Abort the remainder; earlier deletes stand.
                        failed = Some(FailedDelete {
                            key: (partition, row_key),
                            error,
                        });
                        break;
                    }
                }
            }

            StoreResponse::Deleted {
                table,
                outcome: BulkDeleteOutcome { deleted, failed },
            }
        }
        StoreRequest::Shutdown => unreachable!("shutdown is handled by the worker loop"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn spawn_demo(store: MemoryStore) -> (StoreWorker, mpsc::Receiver<StoreResponse>) {
        let (tx, rx) = mpsc::channel();
        let worker = StoreWorker::spawn(store, tx, |r| r);
        (worker, rx)
    }

    #[test]
    fn test_list_tables_roundtrip() {
        let (worker, rx) = spawn_demo(MemoryStore::demo());
        worker.submit(StoreRequest::ListTables).unwrap();

        match rx.recv().unwrap() {
            StoreResponse::Tables(Ok(tables)) => {
                assert!(tables.contains(&"users".to_string()));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_fetch_carries_generation() {
        let (worker, rx) = spawn_demo(MemoryStore::demo());
        let mut counter = Generation::default();
        let generation = counter.advance();

        worker
            .submit(StoreRequest::FetchRows {
                table: "users".to_string(),
                filter: None,
                generation,
            })
            .unwrap();

        match rx.recv().unwrap() {
            StoreResponse::Rows {
                generation: got,
                result: Ok(rows),
                ..
            } => {
                assert_eq!(got, generation);
                assert_eq!(rows.len(), 3);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_bulk_delete_aborts_after_first_failure() {
        let store = MemoryStore::demo();
        store.poison_delete("users", "u002");
        let (worker, rx) = spawn_demo(store);

        worker
            .submit(StoreRequest::DeleteRows {
                table: "users".to_string(),
                keys: vec![
                    ("users".to_string(), "u001".to_string()),
                    ("users".to_string(), "u002".to_string()),
                    ("users".to_string(), "u003".to_string()),
                ],
            })
            .unwrap();

        match rx.recv().unwrap() {
            StoreResponse::Deleted { outcome, .. } => {
                assert_eq!(outcome.deleted, vec![("users".to_string(), "u001".to_string())]);
                let failed = outcome.failed.expect("second delete must fail");
                assert_eq!(failed.key, ("users".to_string(), "u002".to_string()));
            }
            other => panic!("unexpected response: {other:?}"),
        }

        // Third row was never attempted and is still present.
        worker
            .submit(StoreRequest::FetchRows {
                table: "users".to_string(),
                filter: None,
                generation: Generation::default(),
            })
            .unwrap();
        match rx.recv().unwrap() {
            StoreResponse::Rows { result: Ok(rows), .. } => {
                let keys: Vec<&str> = rows.iter().map(|r| r.row_key()).collect();
                assert_eq!(keys, vec!["u002", "u003"]);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
