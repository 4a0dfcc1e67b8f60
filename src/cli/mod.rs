//! Command-line interface for tabgaze.
//!
//! Provides scriptable access to table-store data plus the interactive
//! TUI:
//! - `tui`: browse, sort, filter, and edit rows interactively (default)
//! - `tables`: list available tables
//! - `rows`: print the rows of one table
//! - `completions`: generate shell completions

mod commands;

pub use commands::*;

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use crate::error::Result;

/// Table-store viewer and editor with content-type aware rendering.
#[derive(Debug, Parser)]
#[command(name = "tabgaze")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run (defaults to the TUI).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Connection string for the table store.
    #[arg(short = 'c', long, global = true, env = "TABGAZE_CONNECTION")]
    pub connection_string: Option<String>,

    /// Path to a local JSON data file backend.
    #[arg(short = 'D', long, global = true, env = "TABGAZE_DATA")]
    pub data: Option<PathBuf>,

    /// Use the built-in demo store (in-memory sample tables).
    #[arg(long, global = true)]
    pub demo: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "TABGAZE_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log output file (default: stderr; required for readable TUI logs).
    #[arg(long, global = true, env = "TABGAZE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "TABGAZE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Launch the interactive TUI.
    #[command(alias = "ui")]
    Tui(TuiArgs),

    /// List available tables.
    #[command(alias = "ls")]
    Tables(TablesArgs),

    /// Print the rows of a table.
    #[command(alias = "r")]
    Rows(RowsArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the tui command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TuiArgs {
    /// Open this table immediately.
    #[arg(short = 't', long)]
    pub table: Option<String>,

    /// Apply this filter expression to the initial fetch.
    #[arg(short = 'f', long)]
    pub filter: Option<String>,

    /// Theme name (dark, light, high-contrast).
    #[arg(long)]
    pub theme: Option<String>,
}

/// Arguments for the tables command.
#[derive(Debug, Clone, clap::Args)]
pub struct TablesArgs {
    /// Output format.
    #[arg(short = 'o', long, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the rows command.
#[derive(Debug, Clone, clap::Args)]
pub struct RowsArgs {
    /// Table to read.
    pub table: String,

    /// Server-side filter expression (passed through unmodified).
    #[arg(short = 'f', long)]
    pub filter: Option<String>,

    /// Output format.
    #[arg(short = 'o', long, default_value = "text")]
    pub output: OutputFormat,

    /// Sort by this column.
    #[arg(short = 's', long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long)]
    pub desc: bool,

    /// Limit number of rows printed.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with classification labels.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Comma-separated values.
    Csv,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "tabgaze", &mut io::stdout());
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match &cli.log_file {
        Some(path) => match std::fs::File::create(path) {
            Ok(file) => {
                let layer = tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file));
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {}: {e}", path.display());
                return;
            }
        },
        None => {
            let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    match &cli.command {
        None => commands::tui::run(&cli, &TuiArgs::default()),
        Some(Commands::Tui(args)) => commands::tui::run(&cli, args),
        Some(Commands::Tables(args)) => commands::tables::run(&cli, args),
        Some(Commands::Rows(args)) => commands::rows::run(&cli, args),
        Some(Commands::Completions(args)) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
