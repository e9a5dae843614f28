use ratatui::prelude::*;
use ratatui::widgets::{Block, Padding, Paragraph, Widget};
use thousands::Separable;
use unicode_width::UnicodeWidthStr;

use crate::domain::post::Post;
use crate::domain::text;
use crate::presentation::widgets::shrink_text::ShrinkText;

const MAX_DESCRIPTION_LINES: usize = 4;

/// One post row on the feed or a profile: author line, wrapped description
/// and a footer with the comment count and timestamp.
#[derive(Clone, Debug)]
pub struct PostCard {
    post: Post,
    pub highlight: bool,
    selected_style: Style,
    author_style: Style,
    dim_style: Style,
}

impl PostCard {
    pub fn new(post: Post, selected_style: Style, author_style: Style, dim_style: Style) -> Self {
        Self {
            post,
            highlight: false,
            selected_style,
            author_style,
            dim_style,
        }
    }

    fn description_lines(&self, width: usize) -> usize {
        match self.post.description.as_deref() {
            None | Some("") => 0,
            Some(description) => text::wrap_text(description, width)
                .lines()
                .count()
                .min(MAX_DESCRIPTION_LINES),
        }
    }

    /// Rows this card occupies in the list: author line, description,
    /// footer, plus a blank separator.
    pub fn height(&self, area: &Rect) -> u16 {
        let width = area.width.saturating_sub(2) as usize;
        (2 + self.description_lines(width) + 2) as u16
    }

    fn footer(&self) -> String {
        let comments = match self.post.comments_count {
            Some(count) => format!("{} comments", count.separate_with_commas()),
            None => String::from("comments"),
        };
        let timestamp = self.post.created_at.format("%Y-%m-%d %H:%M");
        format!("{comments} · {timestamp}")
    }
}

impl Widget for PostCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        let style = if self.highlight {
            self.selected_style
        } else {
            Style::default()
        };
        let width = inner.width as usize;

        let mut lines: Vec<Line> = Vec::new();
        let author = format!("@{}", self.post.author.username);
        let file_name = text::clamp_line(
            &self.post.file.url,
            width.saturating_sub(author.width() + 1),
        );
        lines.push(Line::from(vec![
            Span::styled(author, self.author_style),
            Span::raw(" "),
            Span::styled(file_name, self.dim_style),
        ]));

        if let Some(description) = self.post.description.as_deref() {
            if !description.is_empty() {
                let body: Text = ShrinkText::new(description, width, MAX_DESCRIPTION_LINES).into();
                lines.extend(body.lines);
            }
        }

        lines.push(Line::from(Span::styled(self.footer(), self.dim_style)));

        Paragraph::new(lines).style(style).render(inner, buf);
    }
}
