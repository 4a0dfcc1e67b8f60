//! Tables command implementation.

use crate::cli::{Cli, OutputFormat, TablesArgs};
use crate::error::Result;
use crate::store::TableStore;

use super::{command_runtime, resolve_backend};

/// Run the tables command.
pub fn run(cli: &Cli, args: &TablesArgs) -> Result<()> {
    let backend = resolve_backend(cli)?;
    let runtime = command_runtime()?;
    let tables = runtime.block_on(backend.list_tables())?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
        OutputFormat::Csv | OutputFormat::Text => {
            for table in &tables {
                println!("{table}");
            }
        }
    }

    Ok(())
}
