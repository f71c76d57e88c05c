use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::mac::DisplayRow;
use crate::ui::{field_line, hint_line};

#[derive(Debug, PartialEq, Eq)]
pub enum QueryAction {
    None,
    Submit,
    Logout,
    Quit,
}

/// The MAC lookup dashboard: search field on top, result list below.
pub struct QueryScreen {
    pub input: String,
    pub validate_format: bool,
    pub rows: Vec<DisplayRow>,
    pub busy: bool,
    pub error: Option<String>,
    pub scroll_state: ListState,
}

impl QueryScreen {
    pub fn new(validate_format: bool) -> Self {
        let mut scroll_state = ListState::default();
        scroll_state.select(Some(0));

        Self {
            input: String::new(),
            validate_format,
            rows: Vec::new(),
            busy: false,
            error: None,
            scroll_state,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> QueryAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => QueryAction::Quit,
                KeyCode::Char('o') => QueryAction::Logout,
                KeyCode::Char('t') => {
                    self.validate_format = !self.validate_format;
                    QueryAction::None
                }
                _ => QueryAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => QueryAction::Quit,
            KeyCode::Enter => QueryAction::Submit,
            KeyCode::Up => {
                self.scroll_up();
                QueryAction::None
            }
            KeyCode::Down => {
                self.scroll_down();
                QueryAction::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                QueryAction::None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                QueryAction::None
            }
            _ => QueryAction::None,
        }
    }

    /// Install a fresh result set, replacing the old one wholesale.
    pub fn set_rows(&mut self, rows: Vec<DisplayRow>) {
        self.rows = rows;
        self.error = None;
        self.scroll_state.select(Some(0));
    }

    /// A failed submission clears the previous results.
    pub fn set_error(&mut self, message: String) {
        self.rows.clear();
        self.error = Some(message);
        self.scroll_state.select(Some(0));
    }

    fn scroll_up(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected > 0 {
                self.scroll_state.select(Some(selected - 1));
            }
        }
    }

    fn scroll_down(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected < self.rows.len().saturating_sub(1) {
                self.scroll_state.select(Some(selected + 1));
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let toggle = if self.validate_format { "on" } else { "off" };
        let input_block = Block::default()
            .title(" Search MAC ")
            .title(Line::from(format!(" Mac Address validation: {toggle} ")).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        frame.render_widget(
            Paragraph::new(field_line(&self.input, "Search MAC", true, false, false))
                .block(input_block),
            chunks[0],
        );

        self.render_results(frame, chunks[1]);

        frame.render_widget(
            hint_line(
                "Enter search | Ctrl+T validation on/off | Up/Down scroll | Ctrl+O logout | Esc quit",
            ),
            chunks[2],
        );
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let title = if self.busy {
            " Results (searching...) "
        } else {
            " Results "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        if self.busy && self.rows.is_empty() {
            let searching = List::new(vec![ListItem::new("Searching...")]).block(block);
            frame.render_widget(searching, area);
            return;
        }

        if let Some(ref error) = self.error {
            let error_text = List::new(vec![ListItem::new(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            ))])
            .block(block);
            frame.render_widget(error_text, area);
            return;
        }

        if self.rows.is_empty() {
            let empty_text = List::new(vec![ListItem::new(
                "No results yet. Enter MAC addresses above, separated by commas.",
            )])
            .block(block);
            frame.render_widget(empty_text, area);
            return;
        }

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                // First line: index + the address as it was submitted
                let title_line = Line::from(vec![
                    Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(row.address.clone(), Style::default().fg(Color::White)),
                ]);

                // Second line: verdict + the tables it was found in
                let mut meta = vec![
                    Span::styled("   ", Style::default()),
                    Span::styled(row.status.clone(), Style::default().fg(Color::Cyan)),
                ];
                if !row.tables.is_empty() {
                    meta.push(Span::styled(
                        format!(" | Found in: {}", row.tables.join(", ")),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                ListItem::new(vec![title_line, Line::from(meta)])
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = self.scroll_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}
