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
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
    SwitchToSignup,
    Quit,
}

pub struct LoginScreen {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub status: FormStatus,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
            status: FormStatus::Initial,
        }
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => LoginAction::Quit,
                KeyCode::Char('s') => LoginAction::SwitchToSignup,
                _ => LoginAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => LoginAction::Quit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                LoginAction::None
            }
            KeyCode::Enter => {
                if self.username.is_empty()
                    || self.password.is_empty()
                    || self.status == FormStatus::Busy
                {
                    LoginAction::None
                } else {
                    LoginAction::Submit
                }
            }
            KeyCode::Backspace => {
                // Editing clears the failure highlight.
                self.status = FormStatus::Initial;
                self.focused_value_mut().pop();
                LoginAction::None
            }
            KeyCode::Char(c) => {
                self.status = FormStatus::Initial;
                self.focused_value_mut().push(c);
                LoginAction::None
            }
            _ => LoginAction::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let failed = self.status == FormStatus::Failure;
        let mut lines = vec![
            label_line("User name", self.focus == LoginField::Username),
            field_line(
                &self.username,
                "User name",
                self.focus == LoginField::Username,
                failed,
                false,
            ),
            Line::from(""),
            label_line("Password", self.focus == LoginField::Password),
            field_line(
                &self.password,
                "Password",
                self.focus == LoginField::Password,
                failed,
                true,
            ),
            Line::from(""),
        ];

        lines.push(match self.status {
            FormStatus::Busy => Line::from(Span::styled(
                "Logging in...",
                Style::default().fg(Color::Yellow),
            )),
            _ => Line::from(Span::styled(
                "[ Log in ]  (Enter)",
                Style::default().fg(Color::Cyan),
            )),
        });

        let card = centered_rect(44, lines.len() as u16 + 2, area);
        let block = Block::default()
            .title(" Log in ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        frame.render_widget(Paragraph::new(lines).block(block), card);

        let footer = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        frame.render_widget(
            hint_line("Tab switch field | Enter log in | Ctrl+S sign up | Esc quit"),
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

    fn filled_screen() -> LoginScreen {
        let mut screen = LoginScreen::new();
        for c in "alice".chars() {
            screen.handle_key(press(KeyCode::Char(c)));
        }
        screen.handle_key(press(KeyCode::Tab));
        for c in "hunter2".chars() {
            screen.handle_key(press(KeyCode::Char(c)));
        }
        screen
    }

    #[test]
    fn test_submit_with_filled_form() {
        let mut screen = filled_screen();
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), LoginAction::Submit);
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let mut screen = LoginScreen::new();
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), LoginAction::None);
    }

    #[test]
    fn test_editing_clears_failure() {
        let mut screen = filled_screen();
        screen.status = FormStatus::Failure;
        screen.handle_key(press(KeyCode::Char('x')));
        assert_eq!(screen.status, FormStatus::Initial);

        screen.status = FormStatus::Failure;
        screen.handle_key(press(KeyCode::Backspace));
        assert_eq!(screen.status, FormStatus::Initial);
    }

    #[test]
    fn test_enter_ignored_while_busy() {
        let mut screen = filled_screen();
        screen.status = FormStatus::Busy;
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), LoginAction::None);
    }

    #[test]
    fn test_switch_to_signup() {
        let mut screen = LoginScreen::new();
        assert_eq!(screen.handle_key(ctrl('s')), LoginAction::SwitchToSignup);
    }

    #[test]
    fn test_quit_keys() {
        let mut screen = LoginScreen::new();
        assert_eq!(screen.handle_key(press(KeyCode::Esc)), LoginAction::Quit);
        assert_eq!(screen.handle_key(ctrl('c')), LoginAction::Quit);
    }
}
