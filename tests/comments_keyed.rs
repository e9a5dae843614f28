//! Comment slots through the public update function: one slot per open
//! post, scroll-appends inside the modal, and eviction when the detail
//! closes or the post disappears.

use chrono::Utc;
use pretty_assertions::assert_eq;

use mindtui::core::cmd::ApiRequest;
use mindtui::core::msg::comments::CommentsMsg;
use mindtui::core::msg::posts::PostsMsg;
use mindtui::core::msg::ui::UiMsg;
use mindtui::core::reconcile::Mutation;
use mindtui::core::state::ui::Screen;
use mindtui::domain::comment::Comment;
use mindtui::domain::post::Post;
use mindtui::domain::query::{CommentQuery, Page, PostQuery};
use mindtui::domain::user::{Author, FileRef};
use mindtui::{update, AppState, Cmd, Msg};

fn test_post(id: u64) -> Post {
    Post {
        id,
        author: Author {
            id: 1,
            username: "ann".to_string(),
            avatar: None,
        },
        file: FileRef {
            url: "https://cdn.example/a.jpg".to_string(),
            mime_type: None,
        },
        description: None,
        comments_count: Some(0),
        created_at: Utc::now(),
    }
}

fn test_comment(id: u64) -> Comment {
    Comment {
        id,
        author: Author {
            id: 2,
            username: "bob".to_string(),
            avatar: None,
        },
        content: format!("comment-{id}"),
        created_at: Utc::now(),
    }
}

fn comment_page(ids: std::ops::RangeInclusive<u64>, total_count: u32, offset: u32) -> Page<Comment> {
    Page {
        items: ids.map(test_comment).collect(),
        total_count,
        offset,
        limit: 20,
    }
}

fn feed_with_post(post_id: u64) -> AppState {
    let state = AppState::default();
    let (state, _) = update(Msg::Ui(UiMsg::Navigate(Screen::Feed)), state);
    let (state, _) = update(
        Msg::Posts(PostsMsg::PageLoaded {
            query: PostQuery::feed(),
            page: Page {
                items: vec![test_post(post_id)],
                total_count: 1,
                offset: 0,
                limit: 8,
            },
        }),
        state,
    );
    state
}

#[test]
fn test_opening_detail_fetches_post_and_comments() {
    let state = feed_with_post(7);

    let (state, cmds) = update(Msg::Ui(UiMsg::OpenPostDetail(7)), state);

    assert!(cmds.contains(&Cmd::Api(ApiRequest::FetchPost { id: 7 })));
    assert!(cmds.contains(&Cmd::Api(ApiRequest::FetchComments {
        post_id: 7,
        offset: 0,
        limit: 20
    })));
    assert!(state.comments.by_post.get(7).is_some());
}

#[test]
fn test_slots_are_keyed_and_evicted_on_close() {
    let state = feed_with_post(7);
    let (state, _) = update(Msg::Ui(UiMsg::OpenPostDetail(7)), state);
    let (state, _) = update(
        Msg::Comments(CommentsMsg::PageLoaded {
            post_id: 7,
            query: CommentQuery,
            page: comment_page(1..=3, 3, 0),
        }),
        state,
    );
    assert_eq!(state.comments.by_post.get(7).map(|slot| slot.len()), Some(3));

    let (state, _) = update(Msg::Ui(UiMsg::CloseModal), state);

    assert!(state.comments.by_post.get(7).is_none());
    assert_eq!(state.posts.current, None);
}

/// A comment page that lands after the detail closed is dropped outright:
/// the evicted slot stays gone instead of coming back empty.
#[test]
fn test_late_comment_page_after_close_is_dropped() {
    let state = feed_with_post(7);
    let (state, _) = update(Msg::Ui(UiMsg::OpenPostDetail(7)), state);
    let (state, _) = update(Msg::Ui(UiMsg::CloseModal), state);
    assert!(state.comments.by_post.get(7).is_none());

    let (state, cmds) = update(
        Msg::Comments(CommentsMsg::PageLoaded {
            post_id: 7,
            query: CommentQuery,
            page: comment_page(1..=3, 3, 0),
        }),
        state,
    );

    assert!(cmds.is_empty());
    assert!(state.comments.by_post.get(7).is_none());
    assert!(state.comments.by_post.is_empty());
}

/// Scrolling inside the modal appends the next comment page, gated by the
/// same latch the feed uses.
#[test]
fn test_modal_scroll_appends_comments() {
    let state = feed_with_post(7);
    let (state, _) = update(Msg::Ui(UiMsg::OpenPostDetail(7)), state);
    let (mut state, _) = update(
        Msg::Comments(CommentsMsg::PageLoaded {
            post_id: 7,
            query: CommentQuery,
            page: comment_page(1..=20, 50, 0),
        }),
        state,
    );

    let mut append_fetches = Vec::new();
    for _ in 0..20 {
        let (next, cmds) = update(Msg::Ui(UiMsg::Down), state);
        state = next;
        append_fetches.extend(cmds.into_iter().filter_map(|cmd| match cmd {
            Cmd::Api(request @ ApiRequest::FetchComments { .. }) => Some(request),
            _ => None,
        }));
    }

    assert_eq!(
        append_fetches,
        vec![ApiRequest::FetchComments {
            post_id: 7,
            offset: 20,
            limit: 20
        }]
    );

    let (state, _) = update(
        Msg::Comments(CommentsMsg::PageLoaded {
            post_id: 7,
            query: CommentQuery,
            page: comment_page(21..=40, 50, 20),
        }),
        state,
    );
    assert_eq!(state.comments.by_post.get(7).map(|slot| slot.len()), Some(40));
}

/// Deleting the open post drops its comment slot along with it.
#[test]
fn test_post_deletion_evicts_comment_slot() {
    let state = feed_with_post(7);
    let (state, _) = update(Msg::Ui(UiMsg::OpenPostDetail(7)), state);
    let (state, _) = update(
        Msg::Comments(CommentsMsg::PageLoaded {
            post_id: 7,
            query: CommentQuery,
            page: comment_page(1..=3, 3, 0),
        }),
        state,
    );

    let (state, _) = update(Msg::Mutation(Mutation::PostDeleted { post_id: 7 }), state);

    assert!(state.comments.by_post.get(7).is_none());
    assert!(state.posts.slot.is_empty());
}

/// The modal selection is independent of the screen selection behind it.
#[test]
fn test_modal_selection_leaves_screen_selection_alone() {
    let state = feed_with_post(7);
    let (state, _) = update(Msg::Ui(UiMsg::Down), state);
    assert_eq!(state.ui.screen_selection, Some(0));

    let (state, _) = update(Msg::Ui(UiMsg::OpenPostDetail(7)), state);
    let (state, _) = update(
        Msg::Comments(CommentsMsg::PageLoaded {
            post_id: 7,
            query: CommentQuery,
            page: comment_page(1..=3, 3, 0),
        }),
        state,
    );
    let (state, _) = update(Msg::Ui(UiMsg::Down), state);
    let (state, _) = update(Msg::Ui(UiMsg::Down), state);

    assert_eq!(state.ui.modal_selection, Some(1));
    assert_eq!(state.ui.screen_selection, Some(0));
}
