//! Blacklist screen
//!
//! Searchable, scroll-appended list of accounts the user has blocked.

use ratatui::prelude::*;

use crate::core::state::AppState;
use crate::presentation::components::directory::{render_search_line, render_user_list};

#[derive(Debug, Clone)]
pub struct BlacklistComponent;

impl BlacklistComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(1), Constraint::Min(0)],
        )
        .split(area);

        render_search_line(state, frame, layout[0]);
        render_user_list(
            state,
            frame,
            layout[1],
            state.users.blacklist.items(),
            state.ui.screen_selection,
            "Directory",
        );
    }
}

impl Default for BlacklistComponent {
    fn default() -> Self {
        Self::new()
    }
}
