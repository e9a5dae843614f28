//! Elm-like update function
//!
//! Routes messages to their slices and coordinates everything that spans
//! more than one slice: navigation issuing fetches, scroll positions
//! triggering appends, debounce fires, latch releases and mutation fan-out.

use crate::core::cmd::{ApiRequest, Cmd};
use crate::core::msg::auth::AuthMsg;
use crate::core::msg::comments::CommentsMsg;
use crate::core::msg::posts::PostsMsg;
use crate::core::msg::system::SystemMsg;
use crate::core::msg::ui::UiMsg;
use crate::core::msg::users::UsersMsg;
use crate::core::msg::Msg;
use crate::core::reconcile::reconcile;
use crate::core::state::ui::{ComposeKind, Focus, LoginMode, Modal, Screen};
use crate::core::state::AppState;
use crate::core::trigger::{near_end, Surface, DEBOUNCE_MS};
use crate::domain::query::{
    page_numbers, BlacklistQuery, OrderBy, OrderDirection, PeopleQuery, PostQuery, UserQuery,
};

/// Returns new state and list of commands from current state and message
pub fn update(msg: Msg, mut state: AppState) -> (AppState, Vec<Cmd>) {
    match msg {
        Msg::System(system_msg) => {
            let cmds = state.system.update(system_msg);
            (state, cmds)
        }

        Msg::Auth(auth_msg) => handle_auth(auth_msg, state),

        Msg::Posts(posts_msg) => {
            let failure = match &posts_msg {
                PostsMsg::PageFailed { message, .. }
                | PostsMsg::DetailFailed { message } => Some(message.clone()),
                _ => None,
            };
            let mut cmds = state.posts.update(posts_msg);
            if let Some(message) = failure {
                cmds.extend(state.system.update(SystemMsg::ShowError(message)));
            }
            state.ui.clamp_selection(state.active_list_len());
            (state, cmds)
        }

        Msg::Users(users_msg) => {
            let failure = match &users_msg {
                UsersMsg::DirectoryFailed { message, .. }
                | UsersMsg::ProfileFailed { message }
                | UsersMsg::BlacklistFailed { message, .. }
                | UsersMsg::PeopleFailed { message, .. } => Some(message.clone()),
                _ => None,
            };
            let mut cmds = state.users.update(users_msg);
            if let Some(message) = failure {
                cmds.extend(state.system.update(SystemMsg::ShowError(message)));
            }
            state.ui.clamp_selection(state.active_list_len());
            (state, cmds)
        }

        Msg::Comments(comments_msg) => {
            let failure = match &comments_msg {
                CommentsMsg::Failed { message, .. } => Some(message.clone()),
                _ => None,
            };
            let mut cmds = state.comments.update(comments_msg);
            if let Some(message) = failure {
                cmds.extend(state.system.update(SystemMsg::ShowError(message)));
            }
            state.ui.clamp_selection(state.active_list_len());
            (state, cmds)
        }

        Msg::Mutation(mutation) => {
            state = reconcile(state, &mutation);
            state.ui.clamp_selection(state.active_list_len());
            (state, vec![])
        }

        Msg::DebounceFired {
            surface,
            generation,
        } => {
            if !state.ui.debouncer.is_current(surface, generation) {
                return (state, vec![]);
            }
            let cmds = search_fetch(&mut state, surface);
            (state, cmds)
        }

        Msg::LatchReleased(surface) => {
            release_latch(&mut state, surface);
            (state, vec![])
        }

        Msg::Ui(ui_msg) => handle_ui(ui_msg, state),
    }
}

fn handle_auth(msg: AuthMsg, mut state: AppState) -> (AppState, Vec<Cmd>) {
    let followup = match &msg {
        AuthMsg::LoggedIn(session) => {
            if session.user.is_verified {
                Some(AuthFollowup::EnterFeed)
            } else {
                Some(AuthFollowup::EnterVerify)
            }
        }
        AuthMsg::Verified(_) => Some(AuthFollowup::EnterFeed),
        AuthMsg::LoggedOut | AuthMsg::SessionExpired | AuthMsg::AccountDeleted => {
            Some(AuthFollowup::EnterLogin)
        }
        AuthMsg::AuthFailed { message }
        | AuthMsg::VerificationFailed { message }
        | AuthMsg::ResendFailed { message } => Some(AuthFollowup::Error(message.clone())),
        AuthMsg::ResendCompleted => Some(AuthFollowup::Status(
            "Verification email sent".to_string(),
        )),
        AuthMsg::ProfileSaved(_) => Some(AuthFollowup::Status("Profile updated".to_string())),
        _ => None,
    };

    let mut cmds = state.auth.update(msg);

    match followup {
        Some(AuthFollowup::EnterFeed) => {
            state.ui.navigate(Screen::Feed);
            cmds.extend(state.posts.update(PostsMsg::Requested {
                query: PostQuery::feed(),
            }));
            cmds.push(Cmd::Api(ApiRequest::FetchBlockedMe));
            cmds.push(Cmd::Api(ApiRequest::FetchBlockedByMe));
            // the persisted user record may be stale
            cmds.push(Cmd::Api(ApiRequest::FetchCurrentUser));
        }
        Some(AuthFollowup::EnterVerify) => {
            state.ui.navigate(Screen::Verify);
        }
        Some(AuthFollowup::EnterLogin) => {
            // drop everything loaded under the old account
            let config = state.config.config.clone();
            let mut fresh = AppState::new_with_config(config);
            fresh.system = state.system.clone();
            state = fresh;
            state.ui.navigate(Screen::Login);
        }
        Some(AuthFollowup::Error(message)) => {
            cmds.extend(state.system.update(SystemMsg::ShowError(message)));
        }
        Some(AuthFollowup::Status(message)) => {
            cmds.extend(state.system.update(SystemMsg::UpdateStatusMessage(message)));
        }
        None => {}
    }

    (state, cmds)
}

enum AuthFollowup {
    EnterFeed,
    EnterVerify,
    EnterLogin,
    Error(String),
    Status(String),
}

fn handle_ui(msg: UiMsg, mut state: AppState) -> (AppState, Vec<Cmd>) {
    if !matches!(msg, UiMsg::DeleteAccount) {
        state.ui.confirm_delete = false;
    }
    match msg {
        UiMsg::Tick | UiMsg::Render | UiMsg::Resize(..) => (state, vec![]),

        UiMsg::Navigate(screen) => {
            let cmds = navigate_to(&mut state, screen);
            (state, cmds)
        }

        UiMsg::Back => {
            if state.ui.modal.is_some() {
                return handle_ui(UiMsg::CloseModal, state);
            }
            match state.ui.screen {
                Screen::Directory | Screen::Blacklist | Screen::Profile(_) => {
                    let cmds = navigate_to(&mut state, Screen::Feed);
                    (state, cmds)
                }
                _ => (state, vec![]),
            }
        }

        UiMsg::OpenPostDetail(post_id) => {
            state.ui.open_modal(Modal::PostDetail(post_id));
            let mut cmds = state.posts.update(PostsMsg::DetailRequested(post_id));
            cmds.extend(state.comments.update(CommentsMsg::Requested { post_id }));
            (state, cmds)
        }

        UiMsg::OpenPeople { kind, user_id } => {
            state.ui.open_modal(Modal::People { kind, user_id });
            let cmds = state.users.update(UsersMsg::PeopleRequested {
                kind,
                user_id,
                query: PeopleQuery::default(),
            });
            (state, cmds)
        }

        UiMsg::OpenCompose => {
            let kind = match state.ui.modal {
                Some(Modal::PostDetail(post_id)) => ComposeKind::Comment(post_id),
                Some(_) => return (state, vec![]),
                None => match state.ui.screen {
                    Screen::Feed | Screen::Profile(_) => ComposeKind::Post,
                    _ => return (state, vec![]),
                },
            };
            state.ui.compose.clear();
            state.ui.compose.file_focused = matches!(kind, ComposeKind::Post);
            state.ui.open_modal(Modal::Compose(kind));
            (state, vec![])
        }

        UiMsg::CloseModal => {
            let closed = state.ui.close_modal();
            let cmds = match closed {
                Some(Modal::PostDetail(post_id)) => {
                    let mut cmds = state.posts.update(PostsMsg::DetailClosed);
                    cmds.extend(state.comments.update(CommentsMsg::Closed { post_id }));
                    cmds
                }
                Some(Modal::People { user_id, .. }) => {
                    state.users.update(UsersMsg::PeopleClosed { user_id })
                }
                Some(Modal::Compose(_)) | None => vec![],
            };
            (state, cmds)
        }

        UiMsg::Up => {
            state.ui.select_up(state.active_list_len());
            (state, vec![])
        }
        UiMsg::Down => {
            state.ui.select_down(state.active_list_len());
            let cmds = maybe_load_more(&mut state);
            (state, cmds)
        }
        UiMsg::Top => {
            state.ui.select_top(state.active_list_len());
            (state, vec![])
        }
        UiMsg::Bottom => {
            state.ui.select_bottom(state.active_list_len());
            let cmds = maybe_load_more(&mut state);
            (state, cmds)
        }

        UiMsg::Open => handle_open(state),

        UiMsg::NextPage => directory_page_change(state, 1),
        UiMsg::PrevPage => directory_page_change(state, -1),

        UiMsg::CycleOrder => cycle_order(state),
        UiMsg::Refresh => {
            let cmds = refresh_active(&mut state);
            (state, cmds)
        }

        UiMsg::SearchOpened => {
            if matches!(
                state.active_surface(),
                Some(Surface::Directory | Surface::Blacklist | Surface::People(..))
            ) {
                state.ui.focus = Focus::Search;
            }
            (state, vec![])
        }
        UiMsg::SearchClosed => {
            state.ui.focus = Focus::List;
            (state, vec![])
        }
        UiMsg::SearchKey(key) => {
            if state.ui.focus != Focus::Search {
                return (state, vec![]);
            }
            let Some(surface) = state.active_surface() else {
                return (state, vec![]);
            };
            if !state.ui.search.apply_key(key) {
                return (state, vec![]);
            }
            let generation = state.ui.debouncer.bump(surface);
            (
                state,
                vec![Cmd::Debounce {
                    surface,
                    generation,
                    delay_ms: DEBOUNCE_MS,
                }],
            )
        }

        UiMsg::ComposeKey(key) => {
            handle_compose_key(&mut state, key);
            (state, vec![])
        }
        UiMsg::ComposeSubmitted => compose_submit(state),
        UiMsg::ComposeCancelled => {
            state.ui.compose.clear();
            handle_ui(UiMsg::CloseModal, state)
        }

        UiMsg::LoginKey(key) => {
            state.ui.login.focused_field_mut().apply_key(key);
            (state, vec![])
        }
        UiMsg::LoginFocusNext => {
            state.ui.login.focus_next();
            (state, vec![])
        }
        UiMsg::LoginToggleMode => {
            state.ui.login.toggle_mode();
            (state, vec![])
        }
        UiMsg::LoginSubmitted => login_submit(state),

        UiMsg::VerifyKey(key) => {
            state.ui.verify_token.apply_key(key);
            (state, vec![])
        }
        UiMsg::VerifySubmitted => {
            let token = state.ui.verify_token.content.trim().to_string();
            if token.is_empty() {
                let cmds = state.system.update(SystemMsg::ShowError(
                    "Enter the verification token".to_string(),
                ));
                return (state, cmds);
            }
            let cmds = state.auth.update(AuthMsg::VerifySubmitted { token });
            (state, cmds)
        }

        UiMsg::FollowToggle => follow_toggle(state),
        UiMsg::BlockToggle => block_toggle(state),
        UiMsg::Delete => handle_delete(state),
        UiMsg::Edit => handle_edit(state),
        UiMsg::EditProfile => handle_edit_profile(state),
        UiMsg::DeleteAccount => handle_delete_account(state),
    }
}

/// Navigate and issue the screen's entry fetches
fn navigate_to(state: &mut AppState, screen: Screen) -> Vec<Cmd> {
    state.ui.navigate(screen);
    match screen {
        Screen::Feed => state.posts.update(PostsMsg::Requested {
            query: PostQuery::feed(),
        }),
        Screen::Directory => state.users.update(UsersMsg::DirectoryRequested {
            query: UserQuery::default(),
            offset: 0,
        }),
        Screen::Profile(user_id) => {
            let mut cmds = state.users.update(UsersMsg::ProfileRequested(user_id));
            cmds.extend(state.posts.update(PostsMsg::Requested {
                query: PostQuery::profile(user_id),
            }));
            cmds
        }
        Screen::Blacklist => state.users.update(UsersMsg::BlacklistRequested {
            query: BlacklistQuery::default(),
        }),
        Screen::Login | Screen::Verify => vec![],
    }
}

/// Selection moved down: request the next page when the cursor is near the
/// end of the loaded rows and the slot allows it.
fn maybe_load_more(state: &mut AppState) -> Vec<Cmd> {
    let Some(surface) = state.active_surface() else {
        return vec![];
    };
    let Some(selected) = state.ui.active_selection() else {
        return vec![];
    };
    if !near_end(selected, state.active_list_len()) {
        return vec![];
    }
    match surface {
        Surface::Feed | Surface::ProfilePosts => state.posts.update(PostsMsg::LoadMore),
        Surface::Blacklist => state.users.update(UsersMsg::BlacklistLoadMore),
        Surface::People(kind, user_id) => {
            state.users.update(UsersMsg::PeopleLoadMore { kind, user_id })
        }
        Surface::Comments(post_id) => state.comments.update(CommentsMsg::LoadMore { post_id }),
        // the directory pages explicitly
        Surface::Directory => vec![],
    }
}

fn release_latch(state: &mut AppState, surface: Surface) {
    match surface {
        Surface::Feed | Surface::ProfilePosts => state.posts.slot.release_latch(),
        Surface::Directory => state.users.directory.release_latch(),
        Surface::Blacklist => state.users.blacklist.release_latch(),
        Surface::People(kind, user_id) => {
            state
                .users
                .people_mut(kind)
                .patch_existing(user_id, |slot| slot.release_latch());
        }
        Surface::Comments(post_id) => {
            state
                .comments
                .by_post
                .patch_existing(post_id, |slot| slot.release_latch());
        }
    }
}

/// A debounce window elapsed with its generation still current: issue the
/// reset fetch for the surface's search text.
fn search_fetch(state: &mut AppState, surface: Surface) -> Vec<Cmd> {
    let text = state.ui.search.content.clone();
    match surface {
        Surface::Directory => {
            let (order_by, order_direction) = state
                .users
                .directory
                .query()
                .map_or((OrderBy::default(), OrderDirection::default()), |query| {
                    (query.order_by, query.order_direction)
                });
            state.users.update(UsersMsg::DirectoryRequested {
                query: UserQuery {
                    query: text,
                    order_by,
                    order_direction,
                },
                offset: 0,
            })
        }
        Surface::Blacklist => state.users.update(UsersMsg::BlacklistRequested {
            query: BlacklistQuery { query: text },
        }),
        Surface::People(kind, user_id) => state.users.update(UsersMsg::PeopleRequested {
            kind,
            user_id,
            query: PeopleQuery { query: text },
        }),
        // no search on these surfaces
        Surface::Feed | Surface::ProfilePosts | Surface::Comments(_) => vec![],
    }
}

fn handle_open(state: AppState) -> (AppState, Vec<Cmd>) {
    if let Some(user_id) = state.selected_user().map(|user| user.id) {
        // leaving a people modal for a profile closes the modal first
        let (mut state, mut cmds) = if state.ui.modal.is_some() {
            handle_ui(UiMsg::CloseModal, state)
        } else {
            (state, vec![])
        };
        cmds.extend(navigate_to(&mut state, Screen::Profile(user_id)));
        return (state, cmds);
    }
    if let Some(post_id) = state.selected_post().map(|post| post.id) {
        return handle_ui(UiMsg::OpenPostDetail(post_id), state);
    }
    (state, vec![])
}

fn directory_page_change(mut state: AppState, delta: i64) -> (AppState, Vec<Cmd>) {
    if state.active_surface() != Some(Surface::Directory) {
        return (state, vec![]);
    }
    let limit = state.users.directory_page_size();
    let numbers = page_numbers(
        state.users.directory.total_count(),
        limit,
        state.users.directory.next_offset().saturating_sub(limit),
    );
    let target = i64::from(numbers.current) + delta;
    if target < 1 || target > i64::from(numbers.total) || target == i64::from(numbers.current) {
        return (state, vec![]);
    }
    let offset = (target as u32 - 1) * limit;
    let query = state
        .users
        .directory
        .query()
        .cloned()
        .unwrap_or_default();
    let cmds = state
        .users
        .update(UsersMsg::DirectoryRequested { query, offset });
    (state, cmds)
}

/// Cycle the active listing's ordering: createdAt desc, createdAt asc,
/// username asc, username desc.
fn cycle_order(mut state: AppState) -> (AppState, Vec<Cmd>) {
    fn next(order_by: OrderBy, direction: OrderDirection) -> (OrderBy, OrderDirection) {
        match (order_by, direction) {
            (OrderBy::CreatedAt, OrderDirection::Desc) => (OrderBy::CreatedAt, OrderDirection::Asc),
            (OrderBy::CreatedAt, OrderDirection::Asc) => (OrderBy::Username, OrderDirection::Asc),
            (OrderBy::Username, OrderDirection::Asc) => (OrderBy::Username, OrderDirection::Desc),
            (OrderBy::Username, OrderDirection::Desc) => {
                (OrderBy::CreatedAt, OrderDirection::Desc)
            }
        }
    }

    match state.active_surface() {
        Some(Surface::Directory) => {
            let query = state.users.directory.query().cloned().unwrap_or_default();
            let (order_by, order_direction) = next(query.order_by, query.order_direction);
            let cmds = state.users.update(UsersMsg::DirectoryRequested {
                query: UserQuery {
                    order_by,
                    order_direction,
                    ..query
                },
                offset: 0,
            });
            (state, cmds)
        }
        Some(Surface::Feed | Surface::ProfilePosts) => {
            let Some(query) = state.posts.slot.query().cloned() else {
                return (state, vec![]);
            };
            let (order_by, order_direction) = next(query.order_by, query.order_direction);
            let cmds = state.posts.update(PostsMsg::Requested {
                query: PostQuery {
                    order_by,
                    order_direction,
                    ..query
                },
            });
            (state, cmds)
        }
        _ => (state, vec![]),
    }
}

/// Refetch the active surface from offset 0 under its current query
fn refresh_active(state: &mut AppState) -> Vec<Cmd> {
    match state.active_surface() {
        Some(Surface::Feed | Surface::ProfilePosts) => {
            let Some(query) = state.posts.slot.query().cloned() else {
                return state.posts.update(PostsMsg::Requested {
                    query: PostQuery::feed(),
                });
            };
            state.posts.update(PostsMsg::Requested { query })
        }
        Some(Surface::Directory) => {
            let query = state.users.directory.query().cloned().unwrap_or_default();
            state
                .users
                .update(UsersMsg::DirectoryRequested { query, offset: 0 })
        }
        Some(Surface::Blacklist) => {
            let query = state.users.blacklist.query().cloned().unwrap_or_default();
            state.users.update(UsersMsg::BlacklistRequested { query })
        }
        Some(Surface::People(kind, user_id)) => {
            let query = state
                .users
                .people(kind)
                .get(user_id)
                .and_then(|slot| slot.query().cloned())
                .unwrap_or_default();
            state.users.update(UsersMsg::PeopleRequested {
                kind,
                user_id,
                query,
            })
        }
        Some(Surface::Comments(post_id)) => {
            state.comments.update(CommentsMsg::Requested { post_id })
        }
        None => vec![],
    }
}

fn handle_compose_key(state: &mut AppState, key: crossterm::event::KeyEvent) {
    use crossterm::event::KeyCode;

    // posts carry a file, profiles an avatar; both get the file line
    let has_file = matches!(
        state.ui.modal,
        Some(Modal::Compose(ComposeKind::Post | ComposeKind::EditProfile))
    );
    if key.code == KeyCode::Tab && has_file {
        state.ui.compose.file_focused = !state.ui.compose.file_focused;
        return;
    }
    if has_file && state.ui.compose.file_focused {
        state.ui.compose.file_path.apply_key(key);
        return;
    }
    state.ui.compose.pending_keys.push(key);
    crate::presentation::components::compose::process_pending_keys(&mut state.ui.compose);
}

fn compose_submit(state: AppState) -> (AppState, Vec<Cmd>) {
    let Some(Modal::Compose(kind)) = state.ui.modal else {
        return (state, vec![]);
    };
    let content = state.ui.compose.content.trim().to_string();
    let file_path = state.ui.compose.file_path.content.trim().to_string();

    let request = match kind {
        ComposeKind::Post => {
            if file_path.is_empty() {
                let mut state = state;
                let cmds = state
                    .system
                    .update(SystemMsg::ShowError("A file is required".to_string()));
                return (state, cmds);
            }
            ApiRequest::CreatePost {
                file_path,
                description: (!content.is_empty()).then_some(content),
            }
        }
        ComposeKind::EditPost(id) => ApiRequest::UpdatePost {
            id,
            description: (!content.is_empty()).then_some(content),
        },
        ComposeKind::EditProfile => ApiRequest::UpdateProfile {
            username: None,
            bio: (!content.is_empty()).then_some(content),
            avatar_path: (!file_path.is_empty()).then_some(file_path),
        },
        ComposeKind::Comment(post_id) => {
            if content.is_empty() {
                return (state, vec![]);
            }
            ApiRequest::CreateComment { post_id, content }
        }
    };

    let mut state = state;
    state.ui.compose.clear();
    if matches!(kind, ComposeKind::Post) {
        state.posts.upload_progress = Some(0);
    }
    let (mut state, mut cmds) = handle_ui(UiMsg::CloseModal, state);
    cmds.push(Cmd::Api(request));
    cmds.extend(
        state
            .system
            .update(SystemMsg::UpdateStatusMessage("Sending...".to_string())),
    );
    (state, cmds)
}

fn login_submit(mut state: AppState) -> (AppState, Vec<Cmd>) {
    let mode = state.ui.login.mode;
    let email = state.ui.login.email.content.trim().to_string();
    let username = state.ui.login.username.content.trim().to_string();
    let password = state.ui.login.password.content.clone();

    let valid = !email.is_empty()
        && !password.is_empty()
        && (mode == LoginMode::SignIn || !username.is_empty());
    if !valid {
        let cmds = state
            .system
            .update(SystemMsg::ShowError("All fields are required".to_string()));
        return (state, cmds);
    }
    if state.auth.login_in_flight {
        return (state, vec![]);
    }

    let msg = match mode {
        LoginMode::SignIn => AuthMsg::LoginSubmitted { email, password },
        LoginMode::SignUp => AuthMsg::RegisterSubmitted {
            email,
            username,
            password,
        },
    };
    let cmds = state.auth.update(msg);
    (state, cmds)
}

fn follow_toggle(mut state: AppState) -> (AppState, Vec<Cmd>) {
    let Some(target) = relationship_target(&state) else {
        return (state, vec![]);
    };
    if Some(target.id) == state.auth.current_user_id() {
        return (state, vec![]);
    }
    if target.blocked_by_me || target.blocked_me {
        let cmds = state
            .system
            .update(SystemMsg::ShowError("Unblock this user first".to_string()));
        return (state, cmds);
    }
    let request = if target.followed {
        ApiRequest::Unfollow { user_id: target.id }
    } else {
        ApiRequest::Follow { user_id: target.id }
    };
    (state, vec![Cmd::Api(request)])
}

fn block_toggle(mut state: AppState) -> (AppState, Vec<Cmd>) {
    let Some(target) = relationship_target(&state) else {
        return (state, vec![]);
    };
    if Some(target.id) == state.auth.current_user_id() {
        return (state, vec![]);
    }
    let request = if target.blocked_by_me {
        ApiRequest::Unblock { user_id: target.id }
    } else {
        ApiRequest::Block { user_id: target.id }
    };
    let mut cmds = vec![Cmd::Api(request)];
    if !target.blocked_by_me {
        cmds.extend(state.system.update(SystemMsg::UpdateStatusMessage(format!(
            "Blocking @{}",
            target.username
        ))));
    }
    (state, cmds)
}

struct RelationshipTarget {
    id: crate::domain::EntityId,
    username: String,
    followed: bool,
    blocked_by_me: bool,
    blocked_me: bool,
}

/// The user a follow/block keybinding acts on: the selected row of a user
/// list, or the open profile when nothing narrower is selected.
fn relationship_target(state: &AppState) -> Option<RelationshipTarget> {
    let user = state.selected_user().or_else(|| {
        if matches!(state.ui.screen, Screen::Profile(_)) && state.ui.modal.is_none() {
            state.users.profile.as_ref()
        } else {
            None
        }
    })?;
    Some(RelationshipTarget {
        id: user.id,
        username: user.username.clone(),
        followed: user.is_followed_by_me,
        blocked_by_me: user.blocked_by_me || state.users.blocked_by_me_ids.contains(&user.id),
        blocked_me: user.blocked_me || state.users.blocked_me_ids.contains(&user.id),
    })
}

/// Delete the post or comment under the cursor, own content only
fn handle_delete(state: AppState) -> (AppState, Vec<Cmd>) {
    let own_id = state.auth.current_user_id();

    if let Some(Modal::PostDetail(post_id)) = state.ui.modal {
        // a selected comment wins over the post itself
        if let Some(index) = state.ui.modal_selection {
            let own_comment = state
                .comments
                .by_post
                .get(post_id)
                .and_then(|slot| slot.get(index))
                .filter(|comment| Some(comment.author.id) == own_id)
                .map(|comment| comment.id);
            if let Some(comment_id) = own_comment {
                return (
                    state,
                    vec![Cmd::Api(ApiRequest::DeleteComment {
                        post_id,
                        comment_id,
                    })],
                );
            }
        }
        let owns_post = state
            .posts
            .current
            .as_ref()
            .is_some_and(|post| Some(post.author.id) == own_id);
        if owns_post {
            return (state, vec![Cmd::Api(ApiRequest::DeletePost { id: post_id })]);
        }
        return (state, vec![]);
    }

    let own_post = state
        .selected_post()
        .filter(|post| Some(post.author.id) == own_id)
        .map(|post| post.id);
    match own_post {
        Some(id) => (state, vec![Cmd::Api(ApiRequest::DeletePost { id })]),
        None => (state, vec![]),
    }
}

/// Open the compose modal prefilled with one of the user's own posts
fn handle_edit(mut state: AppState) -> (AppState, Vec<Cmd>) {
    let own_id = state.auth.current_user_id();
    let target = match state.ui.modal {
        Some(Modal::PostDetail(post_id)) => state
            .posts
            .current
            .as_ref()
            .filter(|post| post.id == post_id && Some(post.author.id) == own_id)
            .map(|post| (post.id, post.description.clone())),
        Some(_) => None,
        None => state
            .selected_post()
            .filter(|post| Some(post.author.id) == own_id)
            .map(|post| (post.id, post.description.clone())),
    };
    let Some((post_id, description)) = target else {
        return (state, vec![]);
    };
    state.ui.compose.prefill(description.as_deref().unwrap_or_default());
    state.ui.open_modal(Modal::Compose(ComposeKind::EditPost(post_id)));
    (state, vec![])
}

/// Edit the signed-in user's bio and avatar, from their own profile only
fn handle_edit_profile(mut state: AppState) -> (AppState, Vec<Cmd>) {
    let Some(own_id) = state.auth.current_user_id() else {
        return (state, vec![]);
    };
    if state.ui.modal.is_some() || state.ui.screen != Screen::Profile(own_id) {
        return (state, vec![]);
    }
    let bio = state
        .auth
        .user()
        .and_then(|user| user.bio.clone())
        .unwrap_or_default();
    state.ui.compose.prefill(&bio);
    state.ui.open_modal(Modal::Compose(ComposeKind::EditProfile));
    (state, vec![])
}

/// Deleting the account takes two presses; any other key disarms the first
fn handle_delete_account(mut state: AppState) -> (AppState, Vec<Cmd>) {
    let Some(own_id) = state.auth.current_user_id() else {
        return (state, vec![]);
    };
    if state.ui.modal.is_some() || state.ui.screen != Screen::Profile(own_id) {
        state.ui.confirm_delete = false;
        return (state, vec![]);
    }
    if !state.ui.confirm_delete {
        state.ui.confirm_delete = true;
        let cmds = state.system.update(SystemMsg::UpdateStatusMessage(
            "Press again to delete your account".to_string(),
        ));
        return (state, cmds);
    }
    state.ui.confirm_delete = false;
    (state, vec![Cmd::Api(ApiRequest::DeleteAccount)])
}
