//! Reusable rendering helpers.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableWidgetRow, Table, Wrap};
use ratatui::Frame;

use crate::classify::{classify, Classified, Payload};
use crate::highlight::{highlight, Token};
use crate::model::TableRow;
use crate::util::truncate_display;

use super::state::StatusLine;
use super::theme::Theme;

/// Centered sub-rectangle for modal dialogs, sized in percent.
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Convert highlight tokens into styled lines.
///
/// Tokens never span line breaks except inside `Plain` whitespace runs,
/// so splitting those on `'\n'` reconstructs the pretty-printed layout
/// exactly.
#[must_use]
pub fn tokens_to_lines<'a>(tokens: &'a [Token], theme: &Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::new();
    let mut current: Vec<Span<'a>> = Vec::new();

    for token in tokens {
        let style = theme.token_style(token.style);
        let mut parts = token.text.split('\n');
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Span::styled(first, style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part, style));
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

/// Lines for the inspection modal body, per content kind.
#[must_use]
pub fn inspect_lines<'a>(classified: &'a Classified, theme: &Theme) -> Vec<Line<'a>> {
    match &classified.payload {
        Payload::Json(value) => {
            let tokens = highlight(value);
            let mut lines = Vec::new();
            let owned = tokens_to_lines(&tokens, theme);
            // tokens_to_lines borrows the tokens; detach into owned lines.
            for line in owned {
                lines.push(Line::from(
                    line.spans
                        .into_iter()
                        .map(|s| Span::styled(s.content.into_owned(), s.style))
                        .collect::<Vec<Span<'static>>>(),
                ));
            }
            lines
        }
        Payload::Csv(grid) => csv_lines(grid, theme),
        Payload::Timestamp(iso) => vec![
            Line::from(Span::styled(
                iso.as_str(),
                Style::default().fg(theme.json_number),
            )),
            Line::from(Span::styled(
                format!("(from {})", classified.display),
                Style::default().fg(theme.label),
            )),
        ],
        Payload::Text(text) => text.lines().map(Line::from).collect(),
    }
}

/// Render a parsed CSV grid as aligned lines, first row styled as header.
fn csv_lines<'a>(grid: &[Vec<String>], theme: &Theme) -> Vec<Line<'a>> {
    let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            grid.iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    grid.iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == 0 {
                Style::default()
                    .fg(theme.header)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground)
            };
            let text = row
                .iter()
                .enumerate()
                .map(|(c, cell)| format!("{cell:<width$}", width = widths[c]))
                .collect::<Vec<_>>()
                .join("  ");
            Line::from(Span::styled(text, style))
        })
        .collect()
}

/// One grid cell: classified display text plus an optional kind badge.
#[must_use]
pub fn grid_cell<'a>(
    row: &TableRow,
    column: &str,
    max_width: usize,
    show_labels: bool,
    theme: &Theme,
) -> Cell<'a> {
    let value = row.get(column).cloned().unwrap_or(serde_json::Value::Null);
    let classified = classify(&value, Some(column));

    let mut display = classified.display.replace('\n', "\u{23ce}");
    display = truncate_display(&display, max_width).into_owned();

    let mut spans = Vec::new();
    if show_labels {
        if let Some(label) = classified.label {
            spans.push(Span::styled(
                format!("[{label}] "),
                Style::default().fg(theme.label),
            ));
        }
    }
    spans.push(Span::styled(display, Style::default().fg(theme.foreground)));
    Cell::from(Line::from(spans))
}

/// Build the rows-screen table widget.
#[must_use]
pub fn rows_table<'a>(
    rows: &[TableRow],
    columns: &[String],
    marked: &std::collections::HashSet<(String, String)>,
    sort_header: impl Fn(&str) -> String,
    max_width: usize,
    show_labels: bool,
    theme: &Theme,
) -> Table<'a> {
    let header = TableWidgetRow::new(
        columns
            .iter()
            .map(|c| {
                Cell::from(Span::styled(
                    sort_header(c),
                    Style::default()
                        .fg(theme.header)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect::<Vec<_>>(),
    );

    let body = rows.iter().map(|row| {
        let key = (row.partition_key().to_string(), row.row_key().to_string());
        let cells: Vec<Cell<'a>> = columns
            .iter()
            .map(|c| grid_cell(row, c, max_width, show_labels, theme))
            .collect();
        let widget_row = TableWidgetRow::new(cells);
        if marked.contains(&key) {
            widget_row.style(
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            widget_row
        }
    });

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Max(max_width as u16 + 8))
        .collect();

    Table::new(body, constraints)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(theme.selection)
                .add_modifier(Modifier::BOLD),
        )
        .cell_highlight_style(
            Style::default()
                .bg(theme.selection)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .column_spacing(1)
}

/// Draw the one-line status bar at the bottom of `area`.
pub fn draw_status_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    status: Option<&StatusLine>,
    hint: &str,
    loading: bool,
    theme: &Theme,
) {
    let line = if let Some(status) = status {
        let color = if status.is_error {
            theme.error
        } else {
            theme.success
        };
        Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
    } else if loading {
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.warning),
        ))
    } else {
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(theme.label),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a bordered modal paragraph over a cleared region.
pub fn draw_modal_paragraph(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    lines: Vec<Line<'_>>,
    scroll: usize,
    wrap: bool,
    theme: &Theme,
) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ));
    let mut paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    if wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_tokens_to_lines_reconstructs_layout() {
        let value = json!({"a": 1, "b": [true, null]});
        let tokens = highlight(&value);
        let theme = Theme::dark();
        let lines = tokens_to_lines(&tokens, &theme);

        let joined = lines
            .iter()
            .map(line_text)
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(joined, crate::highlight::pretty(&value));
    }

    #[test]
    fn test_csv_lines_aligns_columns() {
        let grid = vec![
            vec!["id".to_string(), "name".to_string()],
            vec!["1".to_string(), "alpha".to_string()],
            vec!["100".to_string(), "b".to_string()],
        ];
        let theme = Theme::dark();
        let lines = csv_lines(&grid, &theme);
        assert_eq!(line_text(&lines[1]), "1    alpha");
        assert_eq!(line_text(&lines[2]), "100  b    ");
    }

    #[test]
    fn test_grid_cell_newline_replacement() {
        let mut row = TableRow::new("p", "r");
        row.set("note", json!("a\nb"));
        let theme = Theme::dark();
        // Exercised for the side-effect free construction; display text
        // itself is covered through classify tests.
        let _ = grid_cell(&row, "note", 40, true, &theme);
    }
}
