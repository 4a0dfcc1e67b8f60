//! Error types for tabgaze.
//!
//! This module provides error handling following the thiserror pattern.
//! Every remote-store failure is caught at the action boundary and mapped
//! into one of these variants; none of them is fatal to the process.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for tabgaze operations.
#[derive(Error, Debug)]
pub enum TabgazeError {
    /// Connecting to the store or listing tables failed.
    #[error("Connection failed: {message}")]
    ConnectionError {
        /// Human-readable error message.
        message: String,
    },

    /// Fetching rows from a table failed.
    #[error("Failed to fetch rows from '{table}': {message}")]
    RowFetchError {
        /// Table the fetch targeted.
        table: String,
        /// Human-readable error message.
        message: String,
    },

    /// The store rejected a filter expression.
    #[error("Query failed: {message}")]
    QueryError {
        /// Store-reported error message.
        message: String,
    },

    /// No table with the given name exists.
    #[error("Table not found: {table}")]
    TableNotFound {
        /// Table name that was not found.
        table: String,
    },

    /// No row with the given composite key exists.
    #[error("Row not found: ({partition}, {row_key})")]
    RowNotFound {
        /// Partition identifier.
        partition: String,
        /// Row identifier.
        row_key: String,
    },

    /// Saving a row to the store failed.
    #[error("Save failed: {message}")]
    SaveError {
        /// Human-readable error message.
        message: String,
    },

    /// Deleting a row from the store failed.
    #[error("Delete failed for ({partition}, {row_key}): {message}")]
    DeleteError {
        /// Partition identifier of the failed delete.
        partition: String,
        /// Row identifier of the failed delete.
        row_key: String,
        /// Human-readable error message.
        message: String,
    },

    /// A locally edited value failed validation before reaching the store.
    #[error("Invalid value: {message}")]
    ValidationError {
        /// Reason the value was rejected.
        message: String,
    },

    /// A row is missing one of its mandatory identity fields.
    #[error("Row is missing identity field '{field}'")]
    MissingIdentityField {
        /// Name of the missing identity field.
        field: String,
    },

    /// Credential persistence failed.
    #[error("Credential storage error: {message}")]
    CredentialError {
        /// Human-readable error message.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Data file not found.
    #[error("Data file not found: {path}")]
    DataFileNotFound {
        /// Path to the missing data file.
        path: PathBuf,
    },

    /// TUI error.
    #[error("TUI error: {message}")]
    TuiError {
        /// Human-readable error message.
        message: String,
    },

    /// The store worker is no longer reachable.
    #[error("Store worker disconnected")]
    WorkerDisconnected,

    /// Interrupted operation.
    #[error("Operation interrupted")]
    Interrupted,

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Unsupported operation or feature.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl TabgazeError {
    /// Create a new connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Create a new row-fetch error.
    #[must_use]
    pub fn row_fetch(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RowFetchError {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a new query error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
        }
    }

    /// Create a new save error.
    #[must_use]
    pub fn save(message: impl Into<String>) -> Self {
        Self::SaveError {
            message: message.into(),
        }
    }

    /// Create a new delete error.
    #[must_use]
    pub fn delete(
        partition: impl Into<String>,
        row_key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DeleteError {
            partition: partition.into(),
            row_key: row_key.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new unsupported error.
    #[must_use]
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Whether this error is a store-reported filter syntax problem.
    ///
    /// Used to rewrite the raw store message into a hint about quoting
    /// string literals before showing it as a transient alert.
    #[must_use]
    pub fn is_filter_syntax(&self) -> bool {
        match self {
            Self::QueryError { message } => {
                let lower = message.to_lowercase();
                lower.contains("syntax") || lower.contains("could not be parsed")
            }
            _ => false,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionError { .. } => 2,
            Self::TableNotFound { .. }
            | Self::RowNotFound { .. }
            | Self::DataFileNotFound { .. } => 3,
            Self::QueryError { .. } | Self::RowFetchError { .. } => 4,
            Self::ConfigError { .. } | Self::CredentialError { .. } => 5,
            Self::SaveError { .. } | Self::DeleteError { .. } => 6,
            Self::ValidationError { .. } | Self::InvalidArgument { .. } => 64,
            Self::Interrupted => 130,
            Self::IoError { .. } => 74,
            _ => 1,
        }
    }

    /// Check if the UI can stay on its current data after this error.
    ///
    /// Save, delete, and filter failures keep already-fetched rows on
    /// screen; connection and row-fetch failures fall back to the error
    /// screen with a retry path.
    #[must_use]
    pub const fn keeps_fetched_data(&self) -> bool {
        matches!(
            self,
            Self::QueryError { .. }
                | Self::SaveError { .. }
                | Self::DeleteError { .. }
                | Self::ValidationError { .. }
        )
    }
}

/// Result type alias for tabgaze operations.
pub type Result<T> = std::result::Result<T, TabgazeError>;

impl From<std::io::Error> for TabgazeError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for TabgazeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Could not connect to the store.
    pub const EXIT_CONNECTION_ERROR: i32 = 2;
    /// Specified table or row not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Query or row fetch failed.
    pub const EXIT_QUERY_ERROR: i32 = 4;
    /// Invalid configuration or credential storage failure.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Save or delete operation failed.
    pub const EXIT_WRITE_ERROR: i32 = 6;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
    /// Terminated by Ctrl+C (128 + SIGINT).
    pub const EXIT_INTERRUPTED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let conn = TabgazeError::connection("refused");
        assert_eq!(conn.exit_code(), 2);

        let not_found = TabgazeError::TableNotFound {
            table: "orders".to_string(),
        };
        assert_eq!(not_found.exit_code(), 3);

        let interrupted = TabgazeError::Interrupted;
        assert_eq!(interrupted.exit_code(), 130);
    }

    #[test]
    fn test_filter_syntax_detection() {
        let err = TabgazeError::query("filter syntax error near 'eq'");
        assert!(err.is_filter_syntax());

        let err = TabgazeError::query("service unavailable");
        assert!(!err.is_filter_syntax());

        let err = TabgazeError::save("conflict");
        assert!(!err.is_filter_syntax());
    }

    #[test]
    fn test_keeps_fetched_data() {
        assert!(TabgazeError::query("bad filter").keeps_fetched_data());
        assert!(TabgazeError::delete("p", "r", "gone").keeps_fetched_data());
        assert!(!TabgazeError::connection("refused").keeps_fetched_data());
    }
}
