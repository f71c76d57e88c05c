use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::{centered_rect, field_line, hint_line, label_line, FormStatus};

#[derive(Debug, PartialEq, Eq)]
pub enum TwoFactorAction {
    None,
    Submit,
    OpenQr,
    Quit,
}

/// One-time-code prompt shown after a login that requires 2FA. On first
/// enrollment the service also hands back a QR image as a data URL; the
/// terminal cannot draw it, so it is handed to the browser instead.
pub struct TwoFactorScreen {
    pub token: String,
    pub qr_code: Option<String>,
    pub status: FormStatus,
}

impl TwoFactorScreen {
    pub fn new(qr_code: Option<String>) -> Self {
        Self {
            token: String::new(),
            qr_code,
            status: FormStatus::Initial,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TwoFactorAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => TwoFactorAction::Quit,
                KeyCode::Char('b') => TwoFactorAction::OpenQr,
                _ => TwoFactorAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => TwoFactorAction::Quit,
            KeyCode::Enter => {
                if self.token.is_empty() || self.status == FormStatus::Busy {
                    TwoFactorAction::None
                } else {
                    TwoFactorAction::Submit
                }
            }
            KeyCode::Backspace => {
                self.status = FormStatus::Initial;
                self.token.pop();
                TwoFactorAction::None
            }
            KeyCode::Char(c) => {
                self.status = FormStatus::Initial;
                self.token.push(c);
                TwoFactorAction::None
            }
            _ => TwoFactorAction::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        if self.qr_code.is_some() {
            lines.push(Line::from(Span::styled(
                "Scan this QR code with your authenticator app to set up 2FA.",
                Style::default().fg(Color::White),
            )));
            lines.push(Line::from(Span::styled(
                "Press Ctrl+B to open the QR code in your browser.",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }

        lines.push(label_line("2FA Code", true));
        lines.push(field_line(
            &self.token,
            "Enter 2FA Code",
            true,
            self.status == FormStatus::Failure,
            false,
        ));
        lines.push(Line::from(""));
        lines.push(match self.status {
            FormStatus::Busy => Line::from(Span::styled(
                "Verifying...",
                Style::default().fg(Color::Yellow),
            )),
            _ => Line::from(Span::styled(
                "[ Verify ]  (Enter)",
                Style::default().fg(Color::Cyan),
            )),
        });

        let card = centered_rect(56, lines.len() as u16 + 4, area);
        let block = Block::default()
            .title(" Two-Factor Auth ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            card,
        );

        let footer = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        frame.render_widget(hint_line("Enter verify | Ctrl+B open QR | Esc quit"), footer);
    }
}
