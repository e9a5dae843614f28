//! Verification gate
//!
//! Shown after signing up (or restoring an unverified session) until the
//! user submits the token the server emailed them.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::state::AppState;
use crate::presentation::components::centered_rect;

#[derive(Debug, Clone)]
pub struct VerifyComponent;

impl VerifyComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let modal_area = centered_rect(60, 40, area);
        let block = Block::default().borders(Borders::ALL).title("Verify your account");
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let email = state
            .auth
            .user()
            .and_then(|user| user.email.clone())
            .unwrap_or_else(|| String::from("your address"));

        let status = if state.auth.verify_waiting {
            "verifying..."
        } else {
            ""
        };

        let lines = vec![
            Line::from(format!("We sent a verification token to {email}.")),
            Line::from(format!("> token: {}", state.ui.verify_token.content)),
            Line::from(status),
            Line::from(""),
            Line::from(Span::styled(
                "Enter submit · Ctrl-r resend · Ctrl-l log out",
                state.config.config.styles.style("Feed", "dim"),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for VerifyComponent {
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
    fn test_renders_typed_token() {
        let mut state = AppState::default();
        for c in "abc123".chars() {
            state
                .ui
                .verify_token
                .apply_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| VerifyComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(content.contains("token: abc123"));
        assert!(content.contains("Enter submit"));
    }

    #[test]
    fn test_shows_in_flight_status() {
        let mut state = AppState::default();
        state.auth.verify_waiting = true;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| VerifyComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(content.contains("verifying..."));
    }
}
