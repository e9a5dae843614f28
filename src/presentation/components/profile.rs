//! Profile screen
//!
//! Header with the profile record, posts by that user below. The posts
//! reuse the feed's list rendering since both read the same slot.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use thousands::Separable;

use crate::core::state::AppState;
use crate::presentation::components::feed::render_post_list;
use crate::presentation::widgets::shrink_text::ShrinkText;

#[derive(Debug, Clone)]
pub struct ProfileComponent;

impl ProfileComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(6), Constraint::Min(0)],
        )
        .split(area);

        self.render_header(state, frame, layout[0]);
        render_post_list(state, frame, layout[1], state.ui.screen_selection);
    }

    fn render_header(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let styles = &state.config.config.styles;
        let block = Block::default().borders(Borders::BOTTOM);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(user) = state.users.profile.as_ref() else {
            let message = if state.users.profile_loading {
                "Loading profile..."
            } else {
                "Profile unavailable"
            };
            frame.render_widget(
                Paragraph::new(message).style(styles.style("Feed", "dim")),
                inner,
            );
            return;
        };

        let mut header = vec![Span::styled(user.handle(), styles.style("Feed", "author"))];
        if user.is_followed_by_me {
            header.push(Span::styled(" [following]", styles.style("Feed", "accent")));
        }
        if user.blocked_by_me {
            header.push(Span::styled(" [blocked]", styles.style("Feed", "accent")));
        }
        if user.blocked_me {
            header.push(Span::styled(" [blocks you]", styles.style("Feed", "accent")));
        }

        let counts = format!(
            "{} followers · {} following",
            user.subscribers_count.unwrap_or(0).separate_with_commas(),
            user.subscriptions_count.unwrap_or(0).separate_with_commas(),
        );

        let mut lines = vec![
            Line::from(header),
            Line::from(Span::styled(counts, styles.style("Feed", "dim"))),
        ];
        if let Some(bio) = user.bio.as_deref() {
            let bio: Text = ShrinkText::new(bio, inner.width as usize, 2).into();
            lines.extend(bio.lines);
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for ProfileComponent {
    fn default() -> Self {
        Self::new()
    }
}
