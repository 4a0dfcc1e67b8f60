//! TUI event loop and rendering.

use std::io;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, TableState, Wrap};
use ratatui::{Frame, Terminal};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, TabgazeError};
use crate::store::{Backend, CredentialStore, StoreRequest, StoreResponse, StoreWorker};

use super::components::{
    centered_rect, draw_modal_paragraph, draw_status_bar, inspect_lines, rows_table,
};
use super::events::{Event, EventHandler};
use super::state::{AppState, Modal, Screen};
use super::theme::Theme;

/// Startup options carried in from the command line.
#[derive(Debug, Default)]
pub struct Options {
    /// Open this table immediately, skipping the table list.
    pub table: Option<String>,
    /// Initial server-side filter expression.
    pub filter: Option<String>,
    /// Theme override.
    pub theme: Option<String>,
    /// Credential supplied on the command line or environment.
    pub credential: Option<crate::store::Credential>,
}

const TICK_RATE: Duration = Duration::from_millis(250);

/// Run the TUI against `backend` until the user quits.
pub fn run<C: CredentialStore>(
    backend: Backend,
    credential_store: C,
    config: Config,
    options: Options,
) -> Result<()> {
    enable_raw_mode().map_err(|e| TabgazeError::TuiError {
        message: format!("Failed to enable raw mode: {e}"),
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| TabgazeError::TuiError {
        message: format!("Failed to enter alternate screen: {e}"),
    })?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend).map_err(|e| TabgazeError::TuiError {
        message: format!("Failed to create terminal: {e}"),
    })?;

    let result = run_loop(&mut terminal, backend, credential_store, config, options);

    // Restore the terminal even when the loop failed.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn run_loop<C: CredentialStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: Backend,
    credential_store: C,
    config: Config,
    options: Options,
) -> Result<()> {
    let theme = Theme::by_name(options.theme.as_deref().or(Some(&config.theme.name)));

    // Resolution order: command line, then the remembered credential.
    let initial_credential = match &options.credential {
        Some(c) => Some(c.clone()),
        None => credential_store.load().unwrap_or_else(|e| {
            warn!("ignoring unreadable remembered credential: {e}");
            None
        }),
    };

    let mut state = AppState::new(config, theme, initial_credential.clone());
    state.filter = options.filter.clone();

    let events = EventHandler::new(TICK_RATE);
    let worker = StoreWorker::spawn(backend, events.sender(), Event::Store);

    let mut app = App {
        state,
        worker,
        credential_store,
        pending_table: options.table,
    };

    // A credential from the command line or the remembered file connects
    // immediately; the connect form is only for interactive entry.
    if let Some(credential) = initial_credential {
        app.state.credential = Some(credential);
        app.state.loading = true;
        app.worker.submit(StoreRequest::ListTables)?;
    }

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| TabgazeError::TuiError {
                message: format!("Failed to draw frame: {e}"),
            })?;

        match events.next() {
            Ok(Event::Key(key)) => app.on_key(key)?,
            Ok(Event::Store(response)) => app.on_store(response),
            Ok(Event::Tick) | Ok(Event::Resize(_, _)) => {}
            Err(_) => return Err(TabgazeError::WorkerDisconnected),
        }

        if app.state.should_quit {
            return Ok(());
        }
    }
}

struct App<C: CredentialStore> {
    state: AppState,
    worker: StoreWorker,
    credential_store: C,
    /// Table requested on the command line, opened after connecting.
    pending_table: Option<String>,
}

impl<C: CredentialStore> App<C> {
    fn submit(&self, request: Option<StoreRequest>) -> Result<()> {
        match request {
            Some(request) => self.worker.submit(request),
            None => Ok(()),
        }
    }

    // ---- Store responses ------------------------------------------------

    fn on_store(&mut self, response: StoreResponse) {
        match response {
            StoreResponse::Tables(result) => {
                self.state.on_tables(result);
                // A --table argument jumps straight into that table.
                if self.state.screen == Screen::Tables {
                    if let Some(table) = self.pending_table.take() {
                        let request = self.state.open_table(table);
                        if let Err(e) = self.submit(request) {
                            self.state.on_tables(Err(e));
                        }
                    }
                }
            }
            StoreResponse::Rows {
                table,
                generation,
                result,
            } => self.state.on_rows(&table, generation, result),
            StoreResponse::Saved { table, row, result } => {
                self.state.on_saved(&table, row, result);
            }
            StoreResponse::Deleted { table, outcome } => self.state.on_deleted(&table, outcome),
        }
    }

    // ---- Key dispatch ---------------------------------------------------

    fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        debug!(?key, "key event");
        self.state.status = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return Ok(());
        }

        if self.state.modal.is_some() {
            return self.on_modal_key(key);
        }
        if self.state.filter_input.is_some() {
            return self.on_filter_key(key);
        }

        match self.state.screen {
            Screen::Connect => self.on_connect_key(key),
            Screen::Tables => self.on_tables_key(key),
            Screen::Rows => self.on_rows_key(key),
            Screen::Error => {
                match key.code {
                    KeyCode::Char('q') => self.state.should_quit = true,
                    KeyCode::Char('r') | KeyCode::Enter | KeyCode::Esc => {
                        self.state.retry_from_error();
                    }
                    _ => {}
                }
                Ok(())
            }
        }
    }

    fn on_connect_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => {
                let request = self.state.connect(&self.credential_store);
                self.submit(request)
            }
            KeyCode::Tab => {
                self.state.remember = !self.state.remember;
                Ok(())
            }
            KeyCode::Backspace => {
                self.state.credential_input.pop();
                Ok(())
            }
            KeyCode::Esc => {
                self.state.should_quit = true;
                Ok(())
            }
            KeyCode::Char(c) => {
                self.state.credential_input.push(c);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_tables_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.table_move(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.table_move(-1),
            KeyCode::Enter => {
                let request = self.state.open_selected_table();
                return self.submit(request);
            }
            KeyCode::Char('r') => {
                self.state.loading = true;
                return self.worker.submit(StoreRequest::ListTables);
            }
            KeyCode::Char('?') => self.state.modal = Some(Modal::Help),
            KeyCode::Esc => self.state.screen = Screen::Connect,
            _ => {}
        }
        Ok(())
    }

    fn on_rows_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.row_move(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.row_move(-1),
            KeyCode::Char('h') | KeyCode::Left => self.state.col_move(-1),
            KeyCode::Char('l') | KeyCode::Right => self.state.col_move(1),
            KeyCode::PageDown => self.state.row_move(10),
            KeyCode::PageUp => self.state.row_move(-10),
            KeyCode::Char('g') | KeyCode::Home => self.state.row_move(isize::MIN / 2),
            KeyCode::Char('G') | KeyCode::End => self.state.row_move(isize::MAX / 2),
            KeyCode::Char('s') => self.state.toggle_sort(),
            KeyCode::Char('/') => self.state.start_filter(),
            KeyCode::Char('e') => self.state.begin_edit(),
            KeyCode::Char(' ') => self.state.toggle_mark(),
            KeyCode::Char('d') => self.state.request_delete(),
            KeyCode::Char('y') => self.copy_selected_cell(),
            KeyCode::Char('r') => {
                let request = self.state.refresh();
                return self.submit(request);
            }
            KeyCode::Enter => self.state.inspect_cell(),
            KeyCode::Char('?') => self.state.modal = Some(Modal::Help),
            KeyCode::Esc => self.state.back_to_tables(),
            _ => {}
        }
        Ok(())
    }

    fn on_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => {
                let request = self.state.apply_filter();
                return self.submit(request);
            }
            KeyCode::Esc => self.state.cancel_filter(),
            KeyCode::Backspace => {
                if let Some(buffer) = &mut self.state.filter_input {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = &mut self.state.filter_input {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_modal_key(&mut self, key: KeyEvent) -> Result<()> {
        match &mut self.state.modal {
            Some(Modal::Help) => {
                self.state.modal = None;
            }
            Some(Modal::Inspect(inspect)) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => inspect.scroll += 1,
                KeyCode::Char('k') | KeyCode::Up => {
                    inspect.scroll = inspect.scroll.saturating_sub(1);
                }
                KeyCode::PageDown => inspect.scroll += 10,
                KeyCode::PageUp => inspect.scroll = inspect.scroll.saturating_sub(10),
                KeyCode::Char('y') => {
                    let text = inspect.classified.display.clone();
                    self.state.modal = None;
                    copy_to_clipboard(&text);
                }
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.state.modal = None,
                _ => {}
            },
            Some(Modal::Edit(edit)) => match key.code {
                KeyCode::Enter => {
                    let request = self.state.submit_edit();
                    return self.submit(request);
                }
                KeyCode::Esc => self.state.modal = None,
                KeyCode::Backspace => {
                    edit.buffer.pop();
                }
                KeyCode::Char(c) => edit.buffer.push(c),
                _ => {}
            },
            Some(Modal::ConfirmDelete(_)) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let request = self.state.confirm_delete();
                    return self.submit(request);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.state.modal = None,
                _ => {}
            },
            None => {}
        }
        Ok(())
    }

    fn copy_selected_cell(&mut self) {
        let Some(text) = self.state.selected_cell_text() else {
            return;
        };
        copy_to_clipboard(&text);
        self.state.status = Some(super::state::StatusLine {
            text: "Copied cell to clipboard".to_string(),
            is_error: false,
        });
    }

    // ---- Rendering ------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        match self.state.screen {
            Screen::Connect => self.draw_connect(frame, area),
            Screen::Tables => self.draw_tables(frame, area),
            Screen::Rows => self.draw_rows(frame, area),
            Screen::Error => self.draw_error(frame, area),
        }

        match &self.state.modal {
            Some(Modal::Inspect(inspect)) => {
                let modal_area = centered_rect(80, 80, area);
                let lines = inspect_lines(&inspect.classified, &self.state.theme);
                draw_modal_paragraph(
                    frame,
                    modal_area,
                    &inspect.title,
                    lines,
                    inspect.scroll,
                    true,
                    &self.state.theme,
                );
            }
            Some(Modal::Edit(edit)) => {
                let modal_area = centered_rect(70, 30, area);
                let theme = &self.state.theme;
                let mut lines = vec![
                    Line::from(Span::styled(
                        format!("{}\u{2588}", edit.buffer),
                        Style::default().fg(theme.foreground),
                    )),
                    Line::default(),
                ];
                if edit.json_expected {
                    lines.push(Line::from(Span::styled(
                        "Value must be valid JSON",
                        Style::default().fg(theme.label),
                    )));
                }
                if let Some(error) = &edit.error {
                    lines.push(Line::from(Span::styled(
                        error.clone(),
                        Style::default().fg(theme.error),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    "Enter save · Esc cancel · empty clears the field",
                    Style::default().fg(theme.label),
                )));
                let title = format!("Edit {}", edit.column);
                draw_modal_paragraph(frame, modal_area, &title, lines, 0, true, theme);
            }
            Some(Modal::ConfirmDelete(keys)) => {
                let modal_area = centered_rect(60, 40, area);
                let theme = &self.state.theme;
                let mut lines = vec![
                    Line::from(Span::styled(
                        format!("Delete {} row(s)?", keys.len()),
                        Style::default()
                            .fg(theme.warning)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::default(),
                ];
                for (partition, row_key) in keys.iter().take(8) {
                    lines.push(Line::from(format!("  {partition} / {row_key}")));
                }
                if keys.len() > 8 {
                    lines.push(Line::from(format!("  ... and {} more", keys.len() - 8)));
                }
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "y confirm · n cancel",
                    Style::default().fg(theme.label),
                )));
                draw_modal_paragraph(frame, modal_area, "Confirm delete", lines, 0, false, theme);
            }
            Some(Modal::Help) => {
                let modal_area = centered_rect(60, 70, area);
                let lines = help_lines(&self.state.theme);
                draw_modal_paragraph(
                    frame,
                    modal_area,
                    "Key bindings",
                    lines,
                    0,
                    false,
                    &self.state.theme,
                );
            }
            None => {}
        }
    }

    fn draw_connect(&self, frame: &mut Frame<'_>, area: Rect) {
        let theme = &self.state.theme;
        let modal_area = centered_rect(70, 40, area);

        let checkbox = if self.state.remember { "[x]" } else { "[ ]" };
        let lines = vec![
            Line::from(Span::styled(
                "Connection string",
                Style::default().fg(theme.header),
            )),
            Line::from(Span::styled(
                format!("{}\u{2588}", self.state.credential_input),
                Style::default().fg(theme.foreground),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("{checkbox} Remember this credential (Tab to toggle)"),
                Style::default().fg(theme.label),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Enter connect · Esc quit",
                Style::default().fg(theme.label),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused))
            .title(Span::styled(
                format!(" {} {} ", crate::NAME, crate::VERSION),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            modal_area,
        );

        if let Some(status) = &self.state.status {
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            draw_status_bar(frame, status_area, Some(status), "", false, theme);
        }
    }

    fn draw_tables(&self, frame: &mut Frame<'_>, area: Rect) {
        let theme = &self.state.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let items: Vec<ListItem<'_>> = self
            .state
            .tables
            .iter()
            .map(|name| ListItem::new(name.as_str()))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border_focused))
                    .title(Span::styled(
                        format!(" Tables ({}) ", self.state.tables.len()),
                        Style::default().fg(theme.primary),
                    )),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.table_selected));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        draw_status_bar(
            frame,
            chunks[1],
            self.state.status.as_ref(),
            "Enter open · j/k move · r refresh · ? help · q quit",
            self.state.loading,
            theme,
        );
    }

    fn draw_rows(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let theme = self.state.theme.clone();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        // Title line: table name, row count, filter, marks.
        let table_name = self.state.current_table.as_deref().unwrap_or("?");
        let mut title = format!(" {table_name} \u{2014} {} rows", self.state.rows.len());
        if let Some(filter) = &self.state.filter {
            title.push_str(&format!("  filter: {filter}"));
        }
        if !self.state.marked.is_empty() {
            title.push_str(&format!("  {} marked", self.state.marked.len()));
        }
        frame.render_widget(
            Paragraph::new(Span::styled(
                title,
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            chunks[0],
        );

        let sort = self.state.sort.clone();
        let table = rows_table(
            &self.state.rows,
            &self.state.columns,
            &self.state.marked,
            |column| match &sort.column {
                Some(sorted) if sorted == column => {
                    format!("{column} {}", sort.direction.arrow())
                }
                _ => column.to_string(),
            },
            self.state.config.display.cell_width,
            self.state.config.display.show_labels,
            &theme,
        );

        let mut table_state = TableState::default();
        table_state.select(Some(self.state.row_selected));
        table_state.select_column(Some(self.state.col_selected));
        frame.render_stateful_widget(table, chunks[1], &mut table_state);

        if let Some(buffer) = &self.state.filter_input {
            let line = Line::from(vec![
                Span::styled("filter> ", Style::default().fg(theme.primary)),
                Span::styled(
                    format!("{buffer}\u{2588}"),
                    Style::default().fg(theme.foreground),
                ),
            ]);
            frame.render_widget(Paragraph::new(line), chunks[2]);
        } else {
            draw_status_bar(
                frame,
                chunks[2],
                self.state.status.as_ref(),
                "Enter inspect · e edit · s sort · / filter · space mark · d delete · y copy · ? help",
                self.state.loading,
                &theme,
            );
        }
    }

    fn draw_error(&self, frame: &mut Frame<'_>, area: Rect) {
        let theme = &self.state.theme;
        let modal_area = centered_rect(70, 40, area);
        let message = self.state.error_message.as_deref().unwrap_or("Unknown error");

        let lines = vec![
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(theme.error),
            )),
            Line::default(),
            Line::from(Span::styled(
                "r retry · q quit",
                Style::default().fg(theme.label),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(Span::styled(
                " Error ",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            modal_area,
        );
    }
}

fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let entries: &[(&str, &str)] = &[
        ("j/k, arrows", "move between rows"),
        ("h/l", "move between columns"),
        ("g/G", "first/last row"),
        ("Enter", "inspect the selected cell"),
        ("e", "edit the selected cell"),
        ("s", "sort by the selected column"),
        ("/", "edit the filter expression"),
        ("space", "mark row for deletion"),
        ("d", "delete marked rows (or the current row)"),
        ("y", "copy cell to clipboard"),
        ("r", "refresh"),
        ("Esc", "back"),
        ("q", "quit"),
    ];

    entries
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("  {key:<12}"),
                    Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(action.to_string(), Style::default().fg(theme.foreground)),
            ])
        })
        .collect()
}

/// Best-effort clipboard copy; failures only warn.
fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text.to_string()) {
                warn!("clipboard copy failed: {e}");
            }
        }
        Err(e) => warn!("clipboard unavailable: {e}"),
    }
}
