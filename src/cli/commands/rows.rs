//! Rows command implementation.
//!
//! Prints the rows of one table. Text output runs every cell through the
//! classifier and annotates it with its content label, matching what the
//! TUI shows inline.

use serde_json::Value;

use crate::classify::classify;
use crate::cli::{Cli, OutputFormat, RowsArgs};
use crate::error::Result;
use crate::model::{derive_columns, TableRow};
use crate::store::TableStore;
use crate::util::truncate_display;
use crate::view::{SortDirection, SortState};

use super::{command_runtime, resolve_backend};

/// Widest a text-mode cell is allowed to render.
const MAX_CELL_WIDTH: usize = 40;

/// Run the rows command.
pub fn run(cli: &Cli, args: &RowsArgs) -> Result<()> {
    let backend = resolve_backend(cli)?;
    let runtime = command_runtime()?;
    let mut rows = runtime.block_on(backend.list_rows(&args.table, args.filter.as_deref()))?;

    if let Some(column) = &args.sort {
        let state = SortState {
            column: Some(column.clone()),
            direction: if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        };
        state.apply(&mut rows);
    }

    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    match args.output {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Csv => print_csv(&rows),
        OutputFormat::Text => print_text(&rows),
    }

    Ok(())
}

fn print_json(rows: &[TableRow]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn print_csv(rows: &[TableRow]) {
    let columns = derive_columns(rows);
    println!("{}", columns.iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(","));

    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|c| csv_escape(&raw_text(row.get(c))))
            .collect();
        println!("{}", line.join(","));
    }
}

fn print_text(rows: &[TableRow]) {
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    let columns = derive_columns(rows);
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let Some(value) = row.get(column) else {
                        return "-".to_string();
                    };
                    let classified = classify(value, Some(column));
                    let flattened = flatten(&classified.display);
                    let cell = truncate_display(&flattened, MAX_CELL_WIDTH);
                    match classified.label {
                        Some(label) => format!("{cell} [{label}]"),
                        None => cell.into_owned(),
                    }
                })
                .collect()
        })
        .collect();

    // Column widths from header and rendered cells.
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rendered
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));

    for cells in &rendered {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn raw_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Newlines collapse for single-line table output.
fn flatten(text: &str) -> String {
    if text.contains('\n') {
        text.replace('\n', "⏎")
    } else {
        text.to_string()
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
