//! Post detail modal
//!
//! Full post on top, its comment thread below. Comments live in a keyed
//! slot per post and scroll-append like the feed does.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use thousands::Separable;
use tui_widget_list::{ListBuilder, ListView};

use crate::core::state::ui::Modal;
use crate::core::state::AppState;
use crate::domain::text;
use crate::domain::EntityId;
use crate::presentation::components::centered_rect;
use crate::presentation::widgets::comment_row::CommentRow;
use crate::presentation::widgets::shrink_text::ShrinkText;

const MAX_DESCRIPTION_LINES: usize = 6;

#[derive(Debug, Clone)]
pub struct PostDetailComponent;

impl PostDetailComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let Some(Modal::PostDetail(post_id)) = state.ui.modal else {
            return;
        };

        let modal_area = centered_rect(70, 85, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default().borders(Borders::ALL).title("Post");
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(9), Constraint::Min(0)],
        )
        .split(inner);

        self.render_post(state, frame, layout[0]);
        self.render_comments(state, frame, layout[1], post_id);
    }

    fn render_post(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let styles = &state.config.config.styles;
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(post) = state.posts.current.as_ref() else {
            let message = if state.posts.detail_loading {
                "Loading..."
            } else {
                "Post unavailable"
            };
            frame.render_widget(
                Paragraph::new(message).style(styles.style("Feed", "dim")),
                inner,
            );
            return;
        };

        let width = inner.width as usize;
        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("@{}", post.author.username),
                styles.style("Feed", "author"),
            ),
            Span::raw(" "),
            Span::styled(
                post.created_at.format("%Y-%m-%d %H:%M").to_string(),
                styles.style("Feed", "dim"),
            ),
        ])];
        lines.push(Line::from(Span::styled(
            text::clamp_line(&post.file.url, width),
            styles.style("Feed", "dim"),
        )));
        if let Some(description) = post.description.as_deref() {
            if !description.is_empty() {
                let body: Text = ShrinkText::new(description, width, MAX_DESCRIPTION_LINES).into();
                lines.extend(body.lines);
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_comments(&self, state: &AppState, frame: &mut Frame, area: Rect, post_id: EntityId) {
        let styles = &state.config.config.styles;
        let slot = state.comments.by_post.get(post_id);
        let comments = slot.map(|slot| slot.items()).unwrap_or_default();

        let total = slot.map(|slot| slot.total_count()).unwrap_or(0);
        let mut block = Block::default()
            .padding(Padding::horizontal(1))
            .title(format!("{} comments", total.separate_with_commas()));
        if slot.is_some_and(|slot| slot.is_loading_more()) {
            block = block.title_bottom(Line::from("loading more...").right_aligned());
        }

        if comments.is_empty() {
            let message = if slot.is_some_and(|slot| slot.is_loading()) {
                "Loading..."
            } else {
                "No comments yet"
            };
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(message)
                    .style(styles.style("Feed", "dim"))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let rows: Vec<_> = comments
            .iter()
            .map(|comment| {
                let row = CommentRow::new(
                    comment.clone(),
                    styles.style("Feed", "selected"),
                    styles.style("Feed", "author"),
                    styles.style("Feed", "dim"),
                );
                let height = row.height(&area);
                (row, height)
            })
            .collect();

        let builder = ListBuilder::new(move |context| {
            let (mut row, height) = rows[context.index].clone();
            row.highlight = context.is_selected;
            (row, height)
        });

        let mut list_state = tui_widget_list::ListState::default();
        list_state.select(state.ui.modal_selection);

        let list = ListView::new(builder, comments.len()).block(block);
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

impl Default for PostDetailComponent {
    fn default() -> Self {
        Self::new()
    }
}
