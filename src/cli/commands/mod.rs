//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod rows;
pub mod tables;
pub mod tui;

use crate::cli::Cli;
use crate::error::{Result, TabgazeError};
use crate::store::{Backend, Credential, FileStore, MemoryStore};

/// Select the store backend from CLI options.
///
/// `--demo` wins over `--data`; with neither, there is nothing to talk
/// to and the command fails with usage guidance.
pub fn resolve_backend(cli: &Cli) -> Result<Backend> {
    if cli.demo {
        return Ok(Backend::Memory(MemoryStore::demo()));
    }
    if let Some(path) = &cli.data {
        return Ok(Backend::File(FileStore::open_or_create(path)?));
    }
    Err(TabgazeError::InvalidArgument {
        name: "backend".to_string(),
        reason: "no store backend configured; pass --demo or --data <file>".to_string(),
    })
}

/// Credential supplied on the command line or environment, if any.
#[must_use]
pub fn cli_credential(cli: &Cli) -> Option<Credential> {
    cli.connection_string
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Credential::new)
}

/// Build a current-thread runtime for driving store calls from a
/// synchronous command.
pub fn command_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| TabgazeError::io("Failed to build async runtime", e))
}
