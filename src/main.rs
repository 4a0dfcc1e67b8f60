//! tabgaze: CLI/TUI viewer and editor for schemaless cloud key-value table stores.

use std::process::ExitCode;

use tabgaze::cli;

fn main() -> ExitCode {
    // Run the CLI (logging is initialized by cli::run based on --log-level)
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            // Print cause chain in debug mode
            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(e.exit_code() as u8)
        }
    }
}
