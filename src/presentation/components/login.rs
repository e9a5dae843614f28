//! Login and registration screen

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::state::ui::{LoginField, LoginMode};
use crate::core::state::AppState;
use crate::presentation::components::centered_rect;

#[derive(Debug, Clone)]
pub struct LoginComponent;

impl LoginComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let form = &state.ui.login;
        let modal_area = centered_rect(50, 50, area);

        let title = match form.mode {
            LoginMode::SignIn => "Sign in",
            LoginMode::SignUp => "Sign up",
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1), // email
                Constraint::Length(1), // username (sign-up only)
                Constraint::Length(1), // password
                Constraint::Length(1),
                Constraint::Length(1), // hint
            ],
        )
        .split(inner);

        frame.render_widget(
            field_line("email", &form.email.content, form.focused == LoginField::Email),
            layout[0],
        );
        if form.mode == LoginMode::SignUp {
            frame.render_widget(
                field_line(
                    "username",
                    &form.username.content,
                    form.focused == LoginField::Username,
                ),
                layout[1],
            );
        }
        let masked = "*".repeat(form.password.content.chars().count());
        frame.render_widget(
            field_line("password", &masked, form.focused == LoginField::Password),
            layout[2],
        );

        let hint = match form.mode {
            LoginMode::SignIn => "Enter sign in · Tab next field · Ctrl-t sign up",
            LoginMode::SignUp => "Enter sign up · Tab next field · Ctrl-t sign in",
        };
        let waiting = state.auth.login_in_flight;
        let hint = if waiting { "signing in..." } else { hint };
        frame.render_widget(
            Paragraph::new(hint).style(state.config.config.styles.style("Feed", "dim")),
            layout[4],
        );
    }
}

fn field_line<'a>(label: &str, value: &str, focused: bool) -> Paragraph<'a> {
    let marker = if focused { "> " } else { "  " };
    Paragraph::new(format!("{marker}{label}: {value}"))
}

impl Default for LoginComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::presentation::components::tests::buffer_text;

    #[test]
    fn test_renders_typed_email() {
        let mut state = AppState::default();
        for c in "me@example.com".chars() {
            state
                .ui
                .login
                .focused_field_mut()
                .apply_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| LoginComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(content.contains("me@example.com"));
    }

    #[test]
    fn test_password_is_masked() {
        let mut state = AppState::default();
        state.ui.login.focused = crate::core::state::ui::LoginField::Password;
        for c in "secret".chars() {
            state
                .ui
                .login
                .focused_field_mut()
                .apply_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| LoginComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(!content.contains("secret"));
        assert!(content.contains("******"));
    }

    #[test]
    fn test_sign_up_shows_username_field() {
        let mut state = AppState::default();
        state.ui.login.toggle_mode();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| LoginComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(content.contains("Sign up"));
        assert!(content.contains("username"));
    }
}
