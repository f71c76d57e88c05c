pub mod login;
pub mod query;
pub mod signup;
pub mod twofactor;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Notice, Screen, Severity};

/// Form lifecycle shared by the auth screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Initial,
    Busy,
    Failure,
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match app.screen {
        Screen::SignUp => app.signup.render(frame, area),
        Screen::Login => app.login.render(frame, area),
        Screen::TwoFactor => app.twofactor.render(frame, area),
        Screen::Query => app.query.render(frame, area),
    }
    draw_notices(frame, &app.notices);
}

/// Stack notices above the bottom edge, newest lowest, like a toast tray.
/// Notices that no longer fit are skipped rather than clipped.
fn draw_notices(frame: &mut Frame, notices: &[Notice]) {
    let area = frame.area();
    let mut bottom = area.bottom().saturating_sub(1);

    for notice in notices.iter().rev() {
        let lines: Vec<Line> = notice.text.lines().map(Line::from).collect();
        let text_width = notice
            .text
            .lines()
            .map(|line| line.chars().count() as u16)
            .max()
            .unwrap_or(0);
        let max_width = area.width.saturating_sub(2);
        let width = (text_width + 2).clamp(14.min(max_width), max_width);
        let height = lines.len() as u16 + 2;
        if bottom < area.y + height {
            break;
        }

        let (title, color) = match notice.severity {
            Severity::Info => (" Info ", Color::Blue),
            Severity::Success => (" Success ", Color::Green),
            Severity::Error => (" Error ", Color::Red),
        };
        let rect = Rect::new(
            area.right().saturating_sub(width + 1),
            bottom - height,
            width,
            height,
        );

        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        frame.render_widget(Paragraph::new(lines).block(block), rect);

        bottom = rect.y;
    }
}

/// Center a fixed-size box inside `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub(crate) fn label_line(text: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(text.to_string(), style))
}

/// One editable field as a single line: masked for passwords, a trailing
/// cursor marker when focused, placeholder text while empty.
pub(crate) fn field_line(
    value: &str,
    placeholder: &str,
    focused: bool,
    failed: bool,
    mask: bool,
) -> Line<'static> {
    if value.is_empty() {
        return Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut shown = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if focused {
        shown.push('_');
    }

    let style = if failed {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(shown, style))
}

pub(crate) fn hint_line(text: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(ratatui::layout::Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect, Rect::new(30, 15, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_field_line_masks_password() {
        let line = field_line("hunter2", "Password", false, false, true);
        assert_eq!(line.spans[0].content, "*******");
    }

    #[test]
    fn test_field_line_shows_cursor_when_focused() {
        let line = field_line("alice", "Username", true, false, false);
        assert_eq!(line.spans[0].content, "alice_");
    }

    #[test]
    fn test_field_line_placeholder_when_empty() {
        for focused in [false, true] {
            let line = field_line("", "Search MAC", focused, false, false);
            assert_eq!(line.spans[0].content, "Search MAC");
        }
    }

    #[test]
    fn test_notices_render_on_narrow_terminal() {
        let client =
            Arc::new(ApiClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap());
        let mut app = App::new(client, true);
        app.notify(Severity::Error, "Error occurred while checking MAC address.");

        // Narrower than the tray's preferred minimum width.
        let backend = TestBackend::new(10, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut content = String::new();
        for y in 0..20u16 {
            for x in 0..10u16 {
                content.push_str(buffer[(x, y)].symbol());
            }
        }
        assert!(content.contains("Error"));
    }
}
