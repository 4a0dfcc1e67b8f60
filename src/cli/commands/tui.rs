//! TUI command implementation.

use crate::cli::{Cli, TuiArgs};
use crate::config::Config;
use crate::error::Result;
use crate::store::FileCredentialStore;

use super::{cli_credential, resolve_backend};

/// Run the TUI command.
pub fn run(cli: &Cli, args: &TuiArgs) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    let backend = resolve_backend(cli)?;
    let credential_store = FileCredentialStore::default_location()?;

    let options = crate::tui::Options {
        table: args.table.clone(),
        filter: args.filter.clone(),
        theme: args.theme.clone(),
        credential: cli_credential(cli),
    };

    crate::tui::run(backend, credential_store, config, options)
}
