use serde::{Deserialize, Serialize};

use crate::core::trigger::Surface;
use crate::domain::query::{BlacklistQuery, PeopleKind, PeopleQuery, PostQuery, UserQuery};
use crate::domain::session::Session;
use crate::domain::EntityId;

/// One REST call intent, executed by the background API service.
///
/// Cmd captures what the state machine wants done; the service decides how
/// (HTTP verbs, auth headers, retries live there). List fetches carry the
/// query snapshot they were issued under so responses can be stale-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiRequest {
    Login { email: String, password: String },
    Register {
        email: String,
        username: String,
        password: String,
    },
    Logout,
    FetchCurrentUser,
    /// Submit the emailed verification token; the only request with its
    /// own cancellation handle, so leaving the gate can abort it
    SubmitVerification { token: String },
    CancelVerification,
    ResendVerification,
    UpdateProfile {
        username: Option<String>,
        bio: Option<String>,
        avatar_path: Option<String>,
    },
    DeleteAccount,

    FetchPosts {
        query: PostQuery,
        offset: u32,
        limit: u32,
    },
    FetchPost { id: EntityId },
    CreatePost {
        file_path: String,
        description: Option<String>,
    },
    UpdatePost {
        id: EntityId,
        description: Option<String>,
    },
    DeletePost { id: EntityId },

    FetchComments {
        post_id: EntityId,
        offset: u32,
        limit: u32,
    },
    CreateComment { post_id: EntityId, content: String },
    DeleteComment {
        post_id: EntityId,
        comment_id: EntityId,
    },

    FetchUsers {
        query: UserQuery,
        offset: u32,
        limit: u32,
    },
    FetchUser { id: EntityId },
    FetchBlacklist {
        query: BlacklistQuery,
        offset: u32,
        limit: u32,
    },
    FetchPeople {
        kind: PeopleKind,
        user_id: EntityId,
        query: PeopleQuery,
        offset: u32,
        limit: u32,
    },
    FetchBlockedMe,
    FetchBlockedByMe,

    Follow { user_id: EntityId },
    Unfollow { user_id: EntityId },
    Block { user_id: EntityId },
    Unblock { user_id: EntityId },

    /// Push the current bearer token into the HTTP client
    SetToken(Option<String>),
}

/// Elm-like command definitions: every side effect the update function can
/// ask for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cmd {
    Api(ApiRequest),

    /// Deliver `Msg::DebounceFired` after the debounce window
    Debounce {
        surface: Surface,
        generation: u64,
        delay_ms: u64,
    },
    /// Deliver `Msg::LatchReleased` after the append cool-down
    ReleaseLatch { surface: Surface, delay_ms: u64 },

    PersistSession(Session),
    ClearSession,

    LogError { message: String },
    LogInfo { message: String },

    Batch(Vec<Cmd>),

    None,
}

impl Cmd {
    /// Combine multiple commands into one
    pub fn batch(commands: Vec<Cmd>) -> Cmd {
        let mut commands: Vec<Cmd> = commands
            .into_iter()
            .filter(|cmd| !matches!(cmd, Cmd::None))
            .collect();
        match commands.len() {
            0 => Cmd::None,
            1 => commands.remove(0),
            _ => Cmd::Batch(commands),
        }
    }

    /// Whether the command leaves the update loop (network, disk, timers)
    pub fn is_async(&self) -> bool {
        match self {
            Cmd::Api(..)
            | Cmd::Debounce { .. }
            | Cmd::ReleaseLatch { .. }
            | Cmd::PersistSession(..)
            | Cmd::ClearSession => true,

            Cmd::LogError { .. } | Cmd::LogInfo { .. } | Cmd::None => false,

            Cmd::Batch(cmds) => cmds.iter().any(Cmd::is_async),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Cmd::Api(..) => "api",
            Cmd::Debounce { .. } => "debounce",
            Cmd::ReleaseLatch { .. } => "release-latch",
            Cmd::PersistSession(..) => "persist-session",
            Cmd::ClearSession => "clear-session",
            Cmd::LogError { .. } => "log-error",
            Cmd::LogInfo { .. } => "log-info",
            Cmd::Batch(..) => "batch",
            Cmd::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cmd_batch_empty() {
        assert_eq!(Cmd::batch(vec![]), Cmd::None);
    }

    #[test]
    fn test_cmd_batch_single() {
        let cmd = Cmd::Api(ApiRequest::FetchCurrentUser);
        assert_eq!(Cmd::batch(vec![cmd.clone()]), cmd);
    }

    #[test]
    fn test_cmd_batch_drops_none() {
        let cmd = Cmd::ClearSession;
        assert_eq!(Cmd::batch(vec![Cmd::None, cmd.clone(), Cmd::None]), cmd);
    }

    #[test]
    fn test_cmd_batch_multiple() {
        let cmds = vec![Cmd::ClearSession, Cmd::Api(ApiRequest::Logout)];
        assert_eq!(Cmd::batch(cmds.clone()), Cmd::Batch(cmds));
    }

    #[test]
    fn test_cmd_is_async() {
        assert!(Cmd::Api(ApiRequest::FetchBlockedMe).is_async());
        assert!(Cmd::Debounce {
            surface: Surface::Directory,
            generation: 1,
            delay_ms: 400
        }
        .is_async());
        assert!(!Cmd::LogInfo {
            message: "test".to_string()
        }
        .is_async());
        assert!(!Cmd::None.is_async());
    }

    #[test]
    fn test_cmd_batch_is_async() {
        let sync_batch = Cmd::Batch(vec![Cmd::LogInfo {
            message: "test".to_string(),
        }]);
        assert!(!sync_batch.is_async());

        let async_batch = Cmd::Batch(vec![Cmd::ClearSession]);
        assert!(async_batch.is_async());
    }

    #[test]
    fn test_cmd_serialization() {
        let cmd = Cmd::ReleaseLatch {
            surface: Surface::Feed,
            delay_ms: 80,
        };
        let serialized = serde_json::to_string(&cmd).unwrap();
        let deserialized: Cmd = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cmd, deserialized);
    }
}
