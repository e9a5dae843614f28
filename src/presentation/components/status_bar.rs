//! Status bar component
//!
//! Two lines at the bottom of every screen: the signed-in account and the
//! most recent status or error message.

use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::core::state::AppState;

#[derive(Debug, Clone)]
pub struct StatusBarComponent;

impl StatusBarComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(1), Constraint::Length(1)],
        )
        .split(area);

        frame.render_widget(Clear, layout[0]);
        frame.render_widget(Clear, layout[1]);

        let styles = &state.config.config.styles;
        let account = Paragraph::new(self.account_line(state)).style(styles.style("StatusBar", "normal"));
        frame.render_widget(account, layout[0]);

        let message = state.system.status_message.clone().unwrap_or_default();
        let is_error = state.system.last_error.as_deref() == Some(message.as_str())
            && !message.is_empty();
        let style = if is_error {
            styles.style("StatusBar", "error")
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(message).style(style), layout[1]);
    }

    /// Account line content, without styling
    pub fn account_line(&self, state: &AppState) -> String {
        match state.auth.user() {
            Some(user) if !user.is_verified => format!("{} (unverified)", user.handle()),
            Some(user) => user.handle(),
            None => String::from("not signed in"),
        }
    }
}

impl Default for StatusBarComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::msg::auth::AuthMsg;
    use crate::domain::session::Session;
    use crate::domain::user::User;

    fn signed_in_state(verified: bool) -> AppState {
        let mut state = AppState::default();
        let user: User = serde_json::from_str(&format!(
            r#"{{"id": 1, "username": "ann", "isVerified": {verified}}}"#
        ))
        .unwrap();
        state.auth.update(AuthMsg::LoggedIn(Session {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            user,
        }));
        state
    }

    #[test]
    fn test_account_line_signed_out() {
        let status_bar = StatusBarComponent::new();
        assert_eq!(
            status_bar.account_line(&AppState::default()),
            "not signed in"
        );
    }

    #[test]
    fn test_account_line_signed_in() {
        let status_bar = StatusBarComponent::new();
        assert_eq!(status_bar.account_line(&signed_in_state(true)), "@ann");
    }

    #[test]
    fn test_account_line_unverified() {
        let status_bar = StatusBarComponent::new();
        assert_eq!(
            status_bar.account_line(&signed_in_state(false)),
            "@ann (unverified)"
        );
    }
}
