//! TUI application state.
//!
//! All state transitions are synchronous and pure with respect to IO:
//! actions that need the store return a [`StoreRequest`] for the caller
//! to submit, and completions come back in through the `on_*` handlers.
//! That keeps every transition unit-testable without a terminal or a
//! worker thread.

use std::collections::HashSet;

use serde_json::Value;
use tracing::warn;

use crate::classify::{classify, ContentKind};
use crate::config::Config;
use crate::error::TabgazeError;
use crate::model::{derive_columns, TableRow};
use crate::store::worker::FailedDelete;
use crate::store::{BulkDeleteOutcome, Credential, CredentialStore, StoreRequest};
use crate::view::{Generation, SortState};

use super::theme::Theme;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Credential entry.
    Connect,
    /// Table list.
    Tables,
    /// Row grid for the selected table.
    Rows,
    /// Full-screen error with a retry path.
    Error,
}

/// Modal dialog layered over the current screen.
#[derive(Debug)]
pub enum Modal {
    /// Classified rendering of one cell.
    Inspect(InspectState),
    /// Single-cell edit dialog.
    Edit(EditState),
    /// Bulk delete confirmation.
    ConfirmDelete(Vec<(String, String)>),
    /// Key binding help.
    Help,
}

/// Cell inspection modal.
#[derive(Debug)]
pub struct InspectState {
    /// `table / column` caption.
    pub title: String,
    /// Classification of the inspected value.
    pub classified: crate::classify::Classified,
    /// Vertical scroll offset.
    pub scroll: usize,
}

/// Cell edit dialog.
#[derive(Debug)]
pub struct EditState {
    /// Composite key of the row being edited.
    pub key: (String, String),
    /// Column being edited.
    pub column: String,
    /// Text buffer.
    pub buffer: String,
    /// The original value classified as JSON, so the buffer must parse.
    pub json_expected: bool,
    /// Inline validation/save error.
    pub error: Option<String>,
}

/// Application state.
pub struct AppState {
    /// Loaded configuration.
    pub config: Config,
    /// Current theme.
    pub theme: Theme,
    /// Current screen.
    pub screen: Screen,
    /// Full-screen error message (for [`Screen::Error`]).
    pub error_message: Option<String>,
    /// Credential input buffer on the connect screen.
    pub credential_input: String,
    /// Remember-credential opt-in toggle.
    pub remember: bool,
    /// Credential in use once connected.
    pub credential: Option<Credential>,
    /// Available tables.
    pub tables: Vec<String>,
    /// Selected index in the table list.
    pub table_selected: usize,
    /// Table whose rows are displayed.
    pub current_table: Option<String>,
    /// Fetched rows, replaced wholesale on every update.
    pub rows: Vec<TableRow>,
    /// Derived display columns.
    pub columns: Vec<String>,
    /// Selected row index.
    pub row_selected: usize,
    /// Selected column index.
    pub col_selected: usize,
    /// Composite keys marked for bulk delete.
    pub marked: HashSet<(String, String)>,
    /// Sort state.
    pub sort: SortState,
    /// Applied filter expression.
    pub filter: Option<String>,
    /// Filter input buffer while editing (None = not editing).
    pub filter_input: Option<String>,
    /// Latest row-fetch generation; stale responses are discarded.
    pub generation: Generation,
    /// An operation is in flight.
    pub loading: bool,
    /// Transient status/alert line.
    pub status: Option<StatusLine>,
    /// Active modal, if any.
    pub modal: Option<Modal>,
    /// Quit requested.
    pub should_quit: bool,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Message text.
    pub text: String,
    /// Whether this is an error-level message.
    pub is_error: bool,
}

impl StatusLine {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl AppState {
    /// Create state on the connect screen.
    #[must_use]
    pub fn new(config: Config, theme: Theme, initial_credential: Option<Credential>) -> Self {
        Self {
            config,
            theme,
            screen: Screen::Connect,
            error_message: None,
            credential_input: initial_credential
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            remember: false,
            credential: None,
            tables: Vec::new(),
            table_selected: 0,
            current_table: None,
            rows: Vec::new(),
            columns: Vec::new(),
            row_selected: 0,
            col_selected: 0,
            marked: HashSet::new(),
            sort: SortState::default(),
            filter: None,
            filter_input: None,
            generation: Generation::default(),
            loading: false,
            status: None,
            modal: None,
            should_quit: false,
        }
    }

    // ---- Connect screen -------------------------------------------------

    /// Submit the entered credential and request the table listing.
    ///
    /// Persists or clears the remembered credential according to the
    /// opt-in toggle; persistence failures never block connecting.
    pub fn connect(&mut self, credential_store: &impl CredentialStore) -> Option<StoreRequest> {
        let input = self.credential_input.trim();
        if input.is_empty() {
            self.status = Some(StatusLine::error("Enter a connection string"));
            return None;
        }
        let credential = Credential::new(input);

        if self.remember {
            if let Err(e) = credential_store.save(&credential) {
                warn!("failed to remember credential: {e}");
            }
        } else if let Err(e) = credential_store.clear() {
            warn!("failed to clear remembered credential: {e}");
        }

        self.credential = Some(credential);
        self.loading = true;
        self.status = None;
        Some(StoreRequest::ListTables)
    }

    /// Table listing finished.
    pub fn on_tables(&mut self, result: Result<Vec<String>, TabgazeError>) {
        self.loading = false;
        match result {
            Ok(tables) => {
                self.table_selected = 0;
                self.tables = tables;
                self.screen = Screen::Tables;
                self.error_message = None;
            }
            Err(e) => {
                // Keep the entered credential for retry.
                self.error_message = Some(e.to_string());
                self.screen = Screen::Error;
            }
        }
    }

    // ---- Table list -----------------------------------------------------

    /// Move the table selection.
    pub fn table_move(&mut self, delta: isize) {
        self.table_selected = step(self.table_selected, delta, self.tables.len());
    }

    /// Open the selected table.
    pub fn open_selected_table(&mut self) -> Option<StoreRequest> {
        let table = self.tables.get(self.table_selected)?.clone();
        self.open_table(table)
    }

    /// Open a table by name and request its rows.
    pub fn open_table(&mut self, table: String) -> Option<StoreRequest> {
        self.current_table = Some(table.clone());
        self.sort = SortState::default();
        self.marked.clear();
        self.row_selected = 0;
        self.col_selected = 0;
        Some(self.fetch_rows(table))
    }

    /// Issue a row fetch for `table` under a fresh generation.
    fn fetch_rows(&mut self, table: String) -> StoreRequest {
        self.loading = true;
        StoreRequest::FetchRows {
            table,
            filter: self.filter.clone(),
            generation: self.generation.advance(),
        }
    }

    /// Re-fetch the current table.
    pub fn refresh(&mut self) -> Option<StoreRequest> {
        let table = self.current_table.clone()?;
        Some(self.fetch_rows(table))
    }

    /// Row fetch finished.
    pub fn on_rows(
        &mut self,
        table: &str,
        generation: Generation,
        result: Result<Vec<TableRow>, TabgazeError>,
    ) {
        // A superseded fetch must not overwrite newer state.
        if !self.generation.is_current(generation) {
            warn!(table, "discarding stale row fetch response");
            return;
        }
        if self.current_table.as_deref() != Some(table) {
            return;
        }
        self.loading = false;

        match result {
            Ok(mut rows) => {
                self.sort.apply(&mut rows);
                self.columns = derive_columns(&rows);
                self.rows = rows;
                self.row_selected = self.row_selected.min(self.rows.len().saturating_sub(1));
                self.col_selected = self.col_selected.min(self.columns.len().saturating_sub(1));
                self.screen = Screen::Rows;
            }
            Err(e) if e.is_filter_syntax() => {
                // Transient alert, keep the current view.
                self.status = Some(StatusLine::error(
                    "Filter rejected: check the expression syntax (string literals need single quotes)",
                ));
                self.filter = None;
            }
            Err(e) => {
                // Row-fetch failure drops the in-progress selection.
                self.current_table = None;
                self.rows.clear();
                self.columns.clear();
                self.error_message = Some(e.to_string());
                self.screen = Screen::Error;
            }
        }
    }

    // ---- Rows screen: navigation & sorting ------------------------------

    /// Move the row cursor.
    pub fn row_move(&mut self, delta: isize) {
        self.row_selected = step(self.row_selected, delta, self.rows.len());
    }

    /// Move the column cursor.
    pub fn col_move(&mut self, delta: isize) {
        self.col_selected = step(self.col_selected, delta, self.columns.len());
    }

    /// Toggle sorting on the cursor column and reorder rows locally.
    pub fn toggle_sort(&mut self) {
        let Some(column) = self.columns.get(self.col_selected).cloned() else {
            return;
        };
        self.sort.toggle(&column);
        let mut rows = std::mem::take(&mut self.rows);
        self.sort.apply(&mut rows);
        self.rows = rows;
    }

    /// Currently selected row.
    #[must_use]
    pub fn selected_row(&self) -> Option<&TableRow> {
        self.rows.get(self.row_selected)
    }

    /// Currently selected column name.
    #[must_use]
    pub fn selected_column(&self) -> Option<&str> {
        self.columns.get(self.col_selected).map(String::as_str)
    }

    /// Mark/unmark the current row for bulk delete.
    pub fn toggle_mark(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let key = (row.partition_key().to_string(), row.row_key().to_string());
        if !self.marked.remove(&key) {
            self.marked.insert(key);
        }
    }

    /// Leave the rows screen for the table list.
    pub fn back_to_tables(&mut self) {
        self.current_table = None;
        self.rows.clear();
        self.columns.clear();
        self.marked.clear();
        self.filter = None;
        self.screen = Screen::Tables;
    }

    // ---- Filtering ------------------------------------------------------

    /// Begin editing the filter expression.
    pub fn start_filter(&mut self) {
        self.filter_input = Some(self.filter.clone().unwrap_or_default());
    }

    /// Apply the filter buffer and re-fetch.
    pub fn apply_filter(&mut self) -> Option<StoreRequest> {
        let buffer = self.filter_input.take()?;
        let trimmed = buffer.trim();
        self.filter = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.refresh()
    }

    /// Abandon filter editing.
    pub fn cancel_filter(&mut self) {
        self.filter_input = None;
    }

    // ---- Cell inspection & clipboard ------------------------------------

    /// Open the inspection modal for the selected cell, when expandable.
    pub fn inspect_cell(&mut self) {
        let Some(column) = self.selected_column().map(String::from) else {
            return;
        };
        let Some(row) = self.selected_row() else {
            return;
        };
        let value = row.get(&column).cloned().unwrap_or(Value::Null);
        let classified = classify(&value, Some(&column));
        if !classified.expandable {
            return;
        }

        let table = self.current_table.as_deref().unwrap_or_default();
        self.modal = Some(Modal::Inspect(InspectState {
            title: format!("{table} / {column}"),
            classified,
            scroll: 0,
        }));
    }

    /// Raw text of the selected cell, for the clipboard.
    #[must_use]
    pub fn selected_cell_text(&self) -> Option<String> {
        let column = self.selected_column()?;
        let value = self.selected_row()?.get(column)?;
        Some(crate::classify::stringify(value))
    }

    // ---- Editing --------------------------------------------------------

    /// Open the edit dialog for the selected cell.
    pub fn begin_edit(&mut self) {
        let Some(column) = self.selected_column().map(String::from) else {
            return;
        };
        // Identity fields are immutable; they ARE the key.
        if column == crate::model::PARTITION_KEY
            || column == crate::model::ROW_KEY
            || column == crate::model::TIMESTAMP
        {
            self.status = Some(StatusLine::error("System columns cannot be edited"));
            return;
        }
        let Some(row) = self.selected_row() else {
            return;
        };

        let value = row.get(&column).cloned().unwrap_or(Value::Null);
        let classified = classify(&value, Some(&column));
        let json_expected = classified.kind == ContentKind::Json;
        let buffer = match &value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        self.modal = Some(Modal::Edit(EditState {
            key: (row.partition_key().to_string(), row.row_key().to_string()),
            column,
            buffer,
            json_expected,
            error: None,
        }));
    }

    /// Validate the edit buffer and build the save request.
    ///
    /// Validation failures stay inside the dialog and never reach the
    /// store. An empty buffer removes the field; with full-replace
    /// upsert semantics that actually clears it remotely.
    pub fn submit_edit(&mut self) -> Option<StoreRequest> {
        let Some(Modal::Edit(edit)) = &mut self.modal else {
            return None;
        };

        let new_value = if edit.buffer.trim().is_empty() {
            None
        } else if edit.json_expected {
            match serde_json::from_str::<Value>(&edit.buffer) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    edit.error = Some(format!("Invalid JSON: {e}"));
                    return None;
                }
            }
        } else {
            Some(Value::String(edit.buffer.clone()))
        };

        let key = edit.key.clone();
        let column = edit.column.clone();
        let row = self.rows.iter().find(|r| {
            r.composite_key() == (key.0.as_str(), key.1.as_str())
        })?;

        let mut updated = row.clone();
        match new_value {
            Some(v) => updated.set(&column, v),
            None => {
                updated.remove(&column);
            }
        }

        let table = self.current_table.clone()?;
        self.loading = true;
        Some(StoreRequest::SaveRow {
            table,
            row: updated,
        })
    }

    /// Save finished.
    ///
    /// On success the edited row is swapped into a fresh local
    /// collection (state is replaced wholesale, never mutated in
    /// place) and the dialog closes. On failure the dialog stays open
    /// with the error inline.
    pub fn on_saved(
        &mut self,
        table: &str,
        row: TableRow,
        result: Result<(), TabgazeError>,
    ) {
        self.loading = false;
        if self.current_table.as_deref() != Some(table) {
            return;
        }

        match result {
            Ok(()) => {
                let key = row.composite_key();
                let rows: Vec<TableRow> = self
                    .rows
                    .iter()
                    .map(|r| if r.composite_key() == key { row.clone() } else { r.clone() })
                    .collect();
                self.rows = rows;
                self.columns = derive_columns(&self.rows);
                self.modal = None;
                self.status = Some(StatusLine::info("Saved"));
            }
            Err(e) => {
                if let Some(Modal::Edit(edit)) = &mut self.modal {
                    edit.error = Some(e.to_string());
                } else {
                    self.status = Some(StatusLine::error(e.to_string()));
                }
            }
        }
    }

    // ---- Deleting -------------------------------------------------------

    /// Ask for confirmation to delete the marked rows (or the cursor row).
    pub fn request_delete(&mut self) {
        let keys: Vec<(String, String)> = if self.marked.is_empty() {
            match self.selected_row() {
                Some(row) => vec![(row.partition_key().to_string(), row.row_key().to_string())],
                None => return,
            }
        } else {
            // Delete in display order, not hash order.
            self.rows
                .iter()
                .map(|r| (r.partition_key().to_string(), r.row_key().to_string()))
                .filter(|k| self.marked.contains(k))
                .collect()
        };

        if !keys.is_empty() {
            self.modal = Some(Modal::ConfirmDelete(keys));
        }
    }

    /// Confirmed: build the bulk delete request.
    pub fn confirm_delete(&mut self) -> Option<StoreRequest> {
        let Some(Modal::ConfirmDelete(keys)) = self.modal.take() else {
            return None;
        };
        let table = self.current_table.clone()?;
        self.loading = true;
        Some(StoreRequest::DeleteRows { table, keys })
    }

    /// Bulk delete finished (possibly partially).
    ///
    /// Rows deleted before any failure are removed from local state;
    /// the remainder stays. Fetched data is never discarded on a
    /// delete failure.
    pub fn on_deleted(&mut self, table: &str, outcome: BulkDeleteOutcome) {
        self.loading = false;
        if self.current_table.as_deref() != Some(table) {
            return;
        }

        let deleted: HashSet<(String, String)> = outcome.deleted.into_iter().collect();
        let rows: Vec<TableRow> = self
            .rows
            .iter()
            .filter(|r| {
                let key = (r.partition_key().to_string(), r.row_key().to_string());
                !deleted.contains(&key)
            })
            .cloned()
            .collect();
        self.rows = rows;
        self.marked.retain(|k| !deleted.contains(k));
        self.row_selected = self.row_selected.min(self.rows.len().saturating_sub(1));

        match outcome.failed {
            Some(FailedDelete { key, error }) => {
                self.status = Some(StatusLine::error(format!(
                    "Deleted {} row(s), then failed at ({}, {}): {error}",
                    deleted.len(),
                    key.0,
                    key.1
                )));
            }
            None => {
                self.status = Some(StatusLine::info(format!("Deleted {} row(s)", deleted.len())));
            }
        }
    }

    // ---- Error screen ---------------------------------------------------

    /// Leave the error screen and return to the connect form (the
    /// credential input is retained for retry).
    pub fn retry_from_error(&mut self) {
        self.error_message = None;
        self.screen = Screen::Connect;
    }
}

/// Clamp-stepping for list cursors.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = current as isize + delta;
    target.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::store::MemoryCredentialStore;

    fn connected_state(rows: Vec<TableRow>) -> AppState {
        let mut state = AppState::new(Config::default(), Theme::dark(), None);
        state.credential = Some(Credential::new("test"));
        state.tables = vec!["users".to_string()];
        state.screen = Screen::Tables;
        let request = state.open_table("users".to_string());
        assert!(request.is_some());
        let generation = state.generation;
        state.on_rows("users", generation, Ok(rows));
        state
    }

    fn sample_rows() -> Vec<TableRow> {
        (1..=3)
            .map(|i| {
                let mut row = TableRow::new("users", format!("u{i}"));
                row.set("name", json!(format!("user{i}")));
                row.set("profile", json!({"n": i}));
                row
            })
            .collect()
    }

    #[test]
    fn test_connect_requires_input() {
        let mut state = AppState::new(Config::default(), Theme::dark(), None);
        let store = MemoryCredentialStore::new();

        assert!(state.connect(&store).is_none());
        assert!(state.status.as_ref().is_some_and(|s| s.is_error));

        state.credential_input = "AccountName=demo".to_string();
        assert!(matches!(state.connect(&store), Some(StoreRequest::ListTables)));
    }

    #[test]
    fn test_remember_is_opt_in() {
        let mut state = AppState::new(Config::default(), Theme::dark(), None);
        let store = MemoryCredentialStore::new();
        state.credential_input = "secret".to_string();

        state.connect(&store).unwrap();
        assert!(store.load().unwrap().is_none());

        state.remember = true;
        state.connect(&store).unwrap();
        assert_eq!(store.load().unwrap(), Some(Credential::new("secret")));

        // Unchecking clears on the next connect.
        state.remember = false;
        state.connect(&store).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_listing_failure_keeps_credential_for_retry() {
        let mut state = AppState::new(Config::default(), Theme::dark(), None);
        state.credential_input = "cred".to_string();

        state.on_tables(Err(TabgazeError::connection("refused")));
        assert_eq!(state.screen, Screen::Error);
        assert_eq!(state.credential_input, "cred");

        state.retry_from_error();
        assert_eq!(state.screen, Screen::Connect);
        assert_eq!(state.credential_input, "cred");
    }

    #[test]
    fn test_stale_fetch_response_discarded() {
        let mut state = connected_state(sample_rows());
        assert_eq!(state.rows.len(), 3);

        // A newer fetch supersedes; the old generation must be ignored.
        let old_generation = state.generation;
        let _ = state.refresh();
        state.on_rows("users", old_generation, Ok(vec![]));
        assert_eq!(state.rows.len(), 3, "stale response must not overwrite");

        let current = state.generation;
        state.on_rows("users", current, Ok(vec![]));
        assert_eq!(state.rows.len(), 0);
    }

    #[test]
    fn test_filter_syntax_error_is_transient() {
        let mut state = connected_state(sample_rows());
        state.start_filter();
        state.filter_input = Some("name eq unquoted".to_string());
        let _ = state.apply_filter();

        let generation = state.generation;
        state.on_rows(
            "users",
            generation,
            Err(TabgazeError::query("filter syntax error: bad token")),
        );

        // Rows are kept, a hint is shown, the bad filter is dropped.
        assert_eq!(state.screen, Screen::Rows);
        assert_eq!(state.rows.len(), 3);
        assert_eq!(state.filter, None);
        assert!(state.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_fetch_failure_drops_selection() {
        let mut state = connected_state(sample_rows());
        let _ = state.refresh();
        let generation = state.generation;
        state.on_rows(
            "users",
            generation,
            Err(TabgazeError::row_fetch("users", "503")),
        );

        assert_eq!(state.screen, Screen::Error);
        assert_eq!(state.current_table, None);
        assert!(state.rows.is_empty());
    }

    #[test]
    fn test_edit_validation_blocks_save() {
        let mut state = connected_state(sample_rows());
        // Column order: partitionKey, rowKey, name, profile.
        state.col_selected = 3;
        assert_eq!(state.selected_column(), Some("profile"));

        state.begin_edit();
        let Some(Modal::Edit(edit)) = &mut state.modal else {
            panic!("edit modal expected");
        };
        assert!(edit.json_expected);
        edit.buffer = "{broken".to_string();

        assert!(state.submit_edit().is_none());
        let Some(Modal::Edit(edit)) = &state.modal else {
            panic!("dialog must stay open");
        };
        assert!(edit.error.as_deref().unwrap().contains("Invalid JSON"));
    }

    #[test]
    fn test_system_columns_not_editable() {
        let mut state = connected_state(sample_rows());
        state.col_selected = 0;
        state.begin_edit();
        assert!(state.modal.is_none());
        assert!(state.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_save_success_swaps_row_in() {
        let mut state = connected_state(sample_rows());
        state.col_selected = 2;
        state.begin_edit();
        if let Some(Modal::Edit(edit)) = &mut state.modal {
            edit.buffer = "renamed".to_string();
        }

        let request = state.submit_edit().expect("save request");
        let StoreRequest::SaveRow { table, row } = request else {
            panic!("save request expected");
        };
        assert_eq!(row.get("name"), Some(&json!("renamed")));

        state.on_saved(&table, row, Ok(()));
        assert!(state.modal.is_none());
        assert_eq!(state.rows[0].get("name"), Some(&json!("renamed")));
    }

    #[test]
    fn test_save_failure_stays_inline() {
        let mut state = connected_state(sample_rows());
        state.col_selected = 2;
        state.begin_edit();
        let request = state.submit_edit().expect("save request");
        let StoreRequest::SaveRow { table, row } = request else {
            panic!("save request expected");
        };

        state.on_saved(&table, row, Err(TabgazeError::save("conflict")));
        let Some(Modal::Edit(edit)) = &state.modal else {
            panic!("dialog must stay open on save failure");
        };
        assert!(edit.error.as_deref().unwrap().contains("conflict"));
        // Fetched data untouched.
        assert_eq!(state.rows.len(), 3);
    }

    #[test]
    fn test_partial_bulk_delete() {
        let mut state = connected_state(sample_rows());
        for _ in 0..3 {
            state.toggle_mark();
            state.row_move(1);
        }
        state.request_delete();
        let request = state.confirm_delete().expect("delete request");
        let StoreRequest::DeleteRows { table, keys } = request else {
            panic!("delete request expected");
        };
        assert_eq!(keys.len(), 3);

        // Second delete failed remotely: only u1 is gone.
        state.on_deleted(
            &table,
            BulkDeleteOutcome {
                deleted: vec![("users".to_string(), "u1".to_string())],
                failed: Some(FailedDelete {
                    key: ("users".to_string(), "u2".to_string()),
                    error: TabgazeError::delete("users", "u2", "boom"),
                }),
            },
        );

        let keys: Vec<&str> = state.rows.iter().map(TableRow::row_key).collect();
        assert_eq!(keys, vec!["u2", "u3"]);
        assert!(state.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_inspect_only_expandable_cells() {
        let mut state = connected_state(sample_rows());
        // "name" is short plain text: not expandable.
        state.col_selected = 2;
        state.inspect_cell();
        assert!(state.modal.is_none());

        // "profile" is JSON: expandable.
        state.col_selected = 3;
        state.inspect_cell();
        assert!(matches!(state.modal, Some(Modal::Inspect(_))));
    }

    #[test]
    fn test_toggle_sort_reorders_rows() {
        let mut state = connected_state(sample_rows());
        state.col_selected = 2; // name
        state.toggle_sort();
        state.toggle_sort(); // descending

        let names: Vec<&str> = state
            .rows
            .iter()
            .map(|r| r.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, vec!["user3", "user2", "user1"]);
    }
}
