//! Followers/following modal
//!
//! Opened from a profile; each (kind, user) pair has its own keyed slot so
//! reopening the modal for a different user never shows leftover rows.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear};

use crate::core::state::ui::Modal;
use crate::core::state::AppState;
use crate::domain::query::PeopleKind;
use crate::presentation::components::centered_rect;
use crate::presentation::components::directory::{render_search_line, render_user_list};

#[derive(Debug, Clone)]
pub struct PeopleListComponent;

impl PeopleListComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let Some(Modal::People { kind, user_id }) = state.ui.modal else {
            return;
        };

        let modal_area = centered_rect(70, 80, area);
        frame.render_widget(Clear, modal_area);

        let title = match kind {
            PeopleKind::Followers => "Followers",
            PeopleKind::Following => "Following",
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(1), Constraint::Min(0)],
        )
        .split(inner);

        render_search_line(state, frame, layout[0]);

        let users = state
            .users
            .people(kind)
            .get(user_id)
            .map(|slot| slot.items())
            .unwrap_or_default();
        render_user_list(
            state,
            frame,
            layout[1],
            users,
            state.ui.modal_selection,
            "Directory",
        );
    }
}

impl Default for PeopleListComponent {
    fn default() -> Self {
        Self::new()
    }
}
