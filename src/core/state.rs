//! Application state
//!
//! One `AppState` value owns every slice; the update function is the only
//! writer. Slices keep their own data and expose `update(msg) -> Vec<Cmd>`.

pub mod auth;
pub mod comments;
pub mod keyed;
pub mod paged;
pub mod posts;
pub mod system;
pub mod ui;
pub mod users;

use crate::core::state::auth::AuthState;
use crate::core::state::comments::CommentsState;
use crate::core::state::posts::PostsState;
use crate::core::state::system::SystemState;
use crate::core::state::ui::{Modal, Screen, UiState};
use crate::core::state::users::UsersState;
use crate::core::trigger::Surface;
use crate::domain::post::Post;
use crate::domain::session::Session;
use crate::domain::user::User;
use crate::infrastructure::config::Config;

/// Configuration state - holds all user-configurable settings
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    pub config: Config,
}

/// Unified application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub posts: PostsState,
    pub users: UsersState,
    pub comments: CommentsState,
    pub ui: UiState,
    pub system: SystemState,
    pub config: ConfigState,
}

impl AppState {
    /// Initialize with a loaded configuration
    pub fn new_with_config(config: Config) -> Self {
        let sizes = &config.page_sizes;
        Self {
            posts: PostsState::new(sizes.feed),
            users: UsersState::new(sizes.directory, sizes.blacklist, sizes.people),
            comments: CommentsState::new(sizes.comments),
            config: ConfigState { config },
            ..Default::default()
        }
    }

    /// Initialize from a persisted session; lands on the feed (or the
    /// verification gate when the account is not verified yet).
    pub fn restored(config: Config, session: Session) -> Self {
        let mut state = Self::new_with_config(config);
        let verified = session.user.is_verified;
        state.auth = AuthState::restored(session);
        state.ui.screen = if verified { Screen::Feed } else { Screen::Verify };
        state
    }

    /// Surface of the list the user is currently scrolling
    pub fn active_surface(&self) -> Option<Surface> {
        if let Some(modal) = self.ui.modal {
            return match modal {
                Modal::People { kind, user_id } => Some(Surface::People(kind, user_id)),
                Modal::PostDetail(post_id) => Some(Surface::Comments(post_id)),
                Modal::Compose(_) => None,
            };
        }
        match self.ui.screen {
            Screen::Feed => Some(Surface::Feed),
            Screen::Profile(_) => Some(Surface::ProfilePosts),
            Screen::Directory => Some(Surface::Directory),
            Screen::Blacklist => Some(Surface::Blacklist),
            Screen::Login | Screen::Verify => None,
        }
    }

    /// Loaded length of the active list
    pub fn active_list_len(&self) -> usize {
        match self.active_surface() {
            Some(Surface::Feed | Surface::ProfilePosts) => self.posts.slot.len(),
            Some(Surface::Directory) => self.users.directory.len(),
            Some(Surface::Blacklist) => self.users.blacklist.len(),
            Some(Surface::People(kind, user_id)) => self
                .users
                .people(kind)
                .get(user_id)
                .map_or(0, |slot| slot.len()),
            Some(Surface::Comments(post_id)) => {
                self.comments.by_post.get(post_id).map_or(0, |slot| slot.len())
            }
            None => 0,
        }
    }

    /// The user under the cursor, when the active list is a user list
    pub fn selected_user(&self) -> Option<&User> {
        let index = self.ui.active_selection()?;
        match self.active_surface()? {
            Surface::Directory => self.users.directory.get(index),
            Surface::Blacklist => self.users.blacklist.get(index),
            Surface::People(kind, user_id) => {
                self.users.people(kind).get(user_id)?.get(index)
            }
            _ => None,
        }
    }

    /// The post under the cursor on the feed or a profile
    pub fn selected_post(&self) -> Option<&Post> {
        let index = self.ui.active_selection()?;
        match self.active_surface()? {
            Surface::Feed | Surface::ProfilePosts => self.posts.slot.get(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::query::{Page, PeopleKind, UserQuery};

    fn test_user(id: u64) -> User {
        User {
            id,
            username: format!("user-{id}"),
            email: None,
            bio: None,
            avatar: None,
            is_followed_by_me: false,
            blocked_by_me: false,
            blocked_me: false,
            subscribers_count: None,
            subscriptions_count: None,
            is_verified: true,
            created_at: None,
        }
    }

    #[test]
    fn test_default_lands_on_login() {
        let state = AppState::default();

        assert_eq!(state.ui.screen, Screen::Login);
        assert!(!state.auth.is_authenticated());
        assert_eq!(state.active_surface(), None);
        assert_eq!(state.active_list_len(), 0);
    }

    #[test]
    fn test_restored_unverified_lands_on_verify() {
        let session = Session {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            user: User {
                is_verified: false,
                ..test_user(1)
            },
        };
        let state = AppState::restored(Config::default(), session);

        assert_eq!(state.ui.screen, Screen::Verify);
        assert!(state.auth.is_authenticated());
    }

    #[test]
    fn test_modal_surface_wins_over_screen() {
        let mut state = AppState::default();
        state.ui.screen = Screen::Feed;
        state.ui.open_modal(Modal::People {
            kind: PeopleKind::Followers,
            user_id: 3,
        });

        assert_eq!(
            state.active_surface(),
            Some(Surface::People(PeopleKind::Followers, 3))
        );
    }

    #[test]
    fn test_selected_user_on_directory() {
        let mut state = AppState::default();
        state.ui.screen = Screen::Directory;
        state.users.directory.reset(UserQuery::default());
        state.users.directory.apply_page(Page {
            items: vec![test_user(1), test_user(2)],
            total_count: 2,
            offset: 0,
            limit: 10,
        });
        state.ui.screen_selection = Some(1);

        assert_eq!(state.selected_user().map(|user| user.id), Some(2));
        assert_eq!(state.active_list_len(), 2);
    }
}
