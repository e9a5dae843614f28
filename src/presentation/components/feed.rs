//! Feed screen
//!
//! Scrollable list of posts from followed accounts. Also renders the post
//! list half of the profile screen, since both read the same slot.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Padding, Paragraph};
use tui_widget_list::{ListBuilder, ListView};

use crate::core::state::AppState;
use crate::presentation::widgets::post_card::PostCard;

#[derive(Debug, Clone)]
pub struct FeedComponent;

impl FeedComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        render_post_list(state, frame, area, state.ui.screen_selection);
    }
}

impl Default for FeedComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Post list shared by the feed and profile screens
pub fn render_post_list(
    state: &AppState,
    frame: &mut Frame,
    area: Rect,
    selection: Option<usize>,
) {
    let padding = Padding::new(1, 1, 1, 1);
    let styles = &state.config.config.styles;
    let item_count = state.posts.slot.len();

    if item_count == 0 {
        let message = if state.posts.slot.is_loading() {
            "Loading..."
        } else {
            "No posts to display"
        };
        let empty_block = Block::default().padding(padding);
        let empty_text = Paragraph::new(message)
            .style(styles.style("Feed", "dim"))
            .alignment(Alignment::Center);

        let inner = empty_block.inner(area);
        frame.render_widget(empty_block, area);
        frame.render_widget(empty_text, inner);
        return;
    }

    let cards: Vec<_> = state
        .posts
        .slot
        .items()
        .iter()
        .map(|post| {
            let card = PostCard::new(
                post.clone(),
                styles.style("Feed", "selected"),
                styles.style("Feed", "author"),
                styles.style("Feed", "dim"),
            );
            let height = card.height(&area);
            (card, height)
        })
        .collect();

    let builder = ListBuilder::new(move |context| {
        let (mut card, height) = cards[context.index].clone();
        card.highlight = context.is_selected;
        (card, height)
    });

    let mut list_state = tui_widget_list::ListState::default();
    list_state.select(selection);

    let mut block = Block::default().padding(padding);
    if state.posts.slot.is_loading_more() {
        block = block.title_bottom(Line::from("loading more...").right_aligned());
    }
    let list = ListView::new(builder, item_count).block(block);

    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::core::msg::posts::PostsMsg;
    use crate::domain::post::Post;
    use crate::domain::query::{Page, PostQuery};
    use crate::domain::user::{Author, FileRef};
    use crate::presentation::components::tests::buffer_text;

    fn test_post(id: u64, description: &str) -> Post {
        Post {
            id,
            author: Author {
                id: 1,
                username: format!("author-{id}"),
                avatar: None,
            },
            file: FileRef {
                url: format!("https://cdn.example/{id}.jpg"),
                mime_type: None,
            },
            description: Some(description.to_string()),
            comments_count: Some(0),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn state_with_posts(descriptions: &[&str]) -> AppState {
        let mut state = AppState::default();
        state.ui.screen = crate::core::state::ui::Screen::Feed;
        state.posts.update(PostsMsg::Requested {
            query: PostQuery::feed(),
        });
        let items: Vec<_> = descriptions
            .iter()
            .enumerate()
            .map(|(index, description)| test_post(index as u64 + 1, description))
            .collect();
        let total = items.len() as u32;
        state.posts.update(PostsMsg::PageLoaded {
            query: PostQuery::feed(),
            page: Page {
                items,
                total_count: total,
                offset: 0,
                limit: 8,
            },
        });
        state
    }

    #[test]
    fn test_renders_post_descriptions() {
        let state = state_with_posts(&["first light", "second post"]);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| FeedComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(content.contains("first light"));
        assert!(content.contains("@author-1"));
    }

    #[test]
    fn test_empty_feed_message() {
        let state = AppState::default();
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| FeedComponent::new().view(&state, frame, frame.area()))
            .unwrap();

        let content = buffer_text(terminal.backend());
        assert!(content.contains("No posts to display"));
    }
}
