use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};

use crate::domain::comment::Comment;
use crate::domain::text;
use crate::presentation::widgets::shrink_text::ShrinkText;

const MAX_CONTENT_LINES: usize = 3;

/// One comment in the post detail modal: author plus timestamp, wrapped
/// content below.
#[derive(Clone, Debug)]
pub struct CommentRow {
    comment: Comment,
    pub highlight: bool,
    selected_style: Style,
    author_style: Style,
    dim_style: Style,
}

impl CommentRow {
    pub fn new(
        comment: Comment,
        selected_style: Style,
        author_style: Style,
        dim_style: Style,
    ) -> Self {
        Self {
            comment,
            highlight: false,
            selected_style,
            author_style,
            dim_style,
        }
    }

    fn content_lines(&self, width: usize) -> usize {
        text::wrap_text(&self.comment.content, width)
            .lines()
            .count()
            .max(1)
            .min(MAX_CONTENT_LINES)
    }

    /// Rows this comment occupies: header, content, blank separator.
    pub fn height(&self, area: &Rect) -> u16 {
        (1 + self.content_lines(area.width as usize) + 1) as u16
    }
}

impl Widget for CommentRow {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.highlight {
            self.selected_style
        } else {
            Style::default()
        };
        let width = area.width as usize;

        let header = Line::from(vec![
            Span::styled(
                format!("@{}", self.comment.author.username),
                self.author_style,
            ),
            Span::raw(" "),
            Span::styled(
                self.comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
                self.dim_style,
            ),
        ]);

        let mut lines = vec![header];
        let content: Text = ShrinkText::new(&self.comment.content, width, MAX_CONTENT_LINES).into();
        lines.extend(content.lines);

        Paragraph::new(lines).style(style).render(area, buf);
    }
}
