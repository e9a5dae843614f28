use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};
use thousands::Separable;

use crate::domain::text;
use crate::domain::user::User;

/// One user row: handle, relation markers and a clamped bio line.
#[derive(Clone, Debug)]
pub struct UserRow {
    user: User,
    pub highlight: bool,
    selected_style: Style,
    dim_style: Style,
    accent_style: Style,
}

impl UserRow {
    pub const HEIGHT: u16 = 2;

    pub fn new(user: User, selected_style: Style, dim_style: Style, accent_style: Style) -> Self {
        Self {
            user,
            highlight: false,
            selected_style,
            dim_style,
            accent_style,
        }
    }

    fn markers(&self) -> Vec<&'static str> {
        let mut markers = Vec::new();
        if self.user.is_followed_by_me {
            markers.push("following");
        }
        if self.user.blocked_by_me {
            markers.push("blocked");
        }
        if self.user.blocked_me {
            markers.push("blocks you");
        }
        markers
    }

    fn counts(&self) -> Option<String> {
        let subscribers = self.user.subscribers_count?;
        Some(format!("{} followers", subscribers.separate_with_commas()))
    }
}

impl Widget for UserRow {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.highlight {
            self.selected_style
        } else {
            Style::default()
        };
        let width = area.width.saturating_sub(1) as usize;

        let mut header = vec![Span::raw(self.user.handle())];
        for marker in self.markers() {
            header.push(Span::raw(" "));
            header.push(Span::styled(format!("[{marker}]"), self.accent_style));
        }
        if let Some(counts) = self.counts() {
            header.push(Span::raw(" "));
            header.push(Span::styled(counts, self.dim_style));
        }

        let bio = self
            .user
            .bio
            .as_deref()
            .map(|bio| text::clamp_line(bio, width))
            .unwrap_or_default();

        let lines = vec![
            Line::from(header),
            Line::from(Span::styled(bio, self.dim_style)),
        ];
        Paragraph::new(lines).style(style).render(area, buf);
    }
}
