use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::{centered_rect, field_line, hint_line, label_line, FormStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Username,
    Password,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SignupAction {
    None,
    Submit,
    SwitchToLogin,
    Quit,
}

/// Account-creation form, the screen the program starts on.
pub struct SignupScreen {
    pub username: String,
    pub password: String,
    pub focus: SignupField,
    pub status: FormStatus,
}

impl SignupScreen {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: SignupField::Username,
            status: FormStatus::Initial,
        }
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            SignupField::Username => &mut self.username,
            SignupField::Password => &mut self.password,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SignupAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => SignupAction::Quit,
                KeyCode::Char('l') => SignupAction::SwitchToLogin,
                _ => SignupAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => SignupAction::Quit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    SignupField::Username => SignupField::Password,
                    SignupField::Password => SignupField::Username,
                };
                SignupAction::None
            }
            KeyCode::Enter => {
                // Both fields are required; an incomplete form does not
                // submit, same as clicking a disabled button.
                if self.username.is_empty()
                    || self.password.is_empty()
                    || self.status == FormStatus::Busy
                {
                    SignupAction::None
                } else {
                    SignupAction::Submit
                }
            }
            KeyCode::Backspace => {
                self.focused_value_mut().pop();
                SignupAction::None
            }
            KeyCode::Char(c) => {
                self.focused_value_mut().push(c);
                SignupAction::None
            }
            _ => SignupAction::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            label_line("Username", self.focus == SignupField::Username),
            field_line(
                &self.username,
                "Username",
                self.focus == SignupField::Username,
                false,
                false,
            ),
            Line::from(""),
            label_line("Password", self.focus == SignupField::Password),
            field_line(
                &self.password,
                "Password",
                self.focus == SignupField::Password,
                false,
                true,
            ),
            Line::from(""),
        ];

        lines.push(match self.status {
            FormStatus::Busy => Line::from(Span::styled(
                "Signing up...",
                Style::default().fg(Color::Yellow),
            )),
            _ => Line::from(Span::styled(
                "[ Sign Up ]  (Enter)",
                Style::default().fg(Color::Cyan),
            )),
        });

        if self.status == FormStatus::Failure {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Sign up failed. Please try again.",
                Style::default().fg(Color::Red),
            )));
        }

        let card = centered_rect(44, lines.len() as u16 + 2, area);
        let block = Block::default()
            .title(" Sign Up ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        frame.render_widget(Paragraph::new(lines).block(block), card);

        let footer = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        frame.render_widget(
            hint_line("Tab switch field | Enter sign up | Ctrl+L log in | Esc quit"),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(screen: &mut SignupScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut screen = SignupScreen::new();
        type_str(&mut screen, "alice");
        assert_eq!(screen.username, "alice");
        assert!(screen.password.is_empty());

        screen.handle_key(press(KeyCode::Tab));
        type_str(&mut screen, "hunter2");
        assert_eq!(screen.password, "hunter2");
    }

    #[test]
    fn test_backspace_edits_focused_field() {
        let mut screen = SignupScreen::new();
        type_str(&mut screen, "alicee");
        screen.handle_key(press(KeyCode::Backspace));
        assert_eq!(screen.username, "alice");
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut screen = SignupScreen::new();
        assert_eq!(screen.focus, SignupField::Username);
        screen.handle_key(press(KeyCode::Tab));
        assert_eq!(screen.focus, SignupField::Password);
        screen.handle_key(press(KeyCode::Tab));
        assert_eq!(screen.focus, SignupField::Username);
    }

    #[test]
    fn test_enter_requires_both_fields() {
        let mut screen = SignupScreen::new();
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), SignupAction::None);

        type_str(&mut screen, "alice");
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), SignupAction::None);

        screen.handle_key(press(KeyCode::Tab));
        type_str(&mut screen, "hunter2");
        assert_eq!(
            screen.handle_key(press(KeyCode::Enter)),
            SignupAction::Submit
        );
    }

    #[test]
    fn test_enter_ignored_while_busy() {
        let mut screen = SignupScreen::new();
        type_str(&mut screen, "alice");
        screen.handle_key(press(KeyCode::Tab));
        type_str(&mut screen, "hunter2");
        screen.status = FormStatus::Busy;
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), SignupAction::None);
    }

    #[test]
    fn test_switch_and_quit_keys() {
        let mut screen = SignupScreen::new();
        assert_eq!(screen.handle_key(ctrl('l')), SignupAction::SwitchToLogin);
        assert_eq!(screen.handle_key(ctrl('c')), SignupAction::Quit);
        assert_eq!(screen.handle_key(press(KeyCode::Esc)), SignupAction::Quit);
    }
}
