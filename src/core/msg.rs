//! Domain messages
//!
//! Everything that can happen to the application is a `Msg`. Messages are
//! delegated per state slice; timer-driven messages (debounce fires, latch
//! releases) are routed at the top level by their `Surface`.

pub mod auth;
pub mod comments;
pub mod posts;
pub mod system;
pub mod ui;
pub mod users;

use serde::{Deserialize, Serialize};

use crate::core::msg::auth::AuthMsg;
use crate::core::msg::comments::CommentsMsg;
use crate::core::msg::posts::PostsMsg;
use crate::core::msg::system::SystemMsg;
use crate::core::msg::ui::UiMsg;
use crate::core::msg::users::UsersMsg;
use crate::core::reconcile::Mutation;
use crate::core::trigger::Surface;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    Auth(AuthMsg),
    Posts(PostsMsg),
    Users(UsersMsg),
    Comments(CommentsMsg),
    Ui(UiMsg),
    System(SystemMsg),
    /// A confirmed server-side mutation, fanned out by the reconciler
    Mutation(Mutation),
    /// A debounce timer fired; stale generations are dropped
    DebounceFired { surface: Surface, generation: u64 },
    /// The append cool-down elapsed for a surface
    LatchReleased(Surface),
}

impl Msg {
    /// Messages that arrive every frame or tick and should not be traced
    pub fn is_frequent(&self) -> bool {
        matches!(self, Msg::Ui(UiMsg::Tick) | Msg::Ui(UiMsg::Render))
    }
}

impl From<AuthMsg> for Msg {
    fn from(msg: AuthMsg) -> Self {
        Msg::Auth(msg)
    }
}

impl From<PostsMsg> for Msg {
    fn from(msg: PostsMsg) -> Self {
        Msg::Posts(msg)
    }
}

impl From<UsersMsg> for Msg {
    fn from(msg: UsersMsg) -> Self {
        Msg::Users(msg)
    }
}

impl From<CommentsMsg> for Msg {
    fn from(msg: CommentsMsg) -> Self {
        Msg::Comments(msg)
    }
}

impl From<UiMsg> for Msg {
    fn from(msg: UiMsg) -> Self {
        Msg::Ui(msg)
    }
}

impl From<SystemMsg> for Msg {
    fn from(msg: SystemMsg) -> Self {
        Msg::System(msg)
    }
}

impl From<Mutation> for Msg {
    fn from(mutation: Mutation) -> Self {
        Msg::Mutation(mutation)
    }
}
