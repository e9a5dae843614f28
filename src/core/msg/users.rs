use serde::{Deserialize, Serialize};

use crate::domain::query::{BlacklistQuery, Page, PeopleKind, PeopleQuery, UserQuery};
use crate::domain::user::User;
use crate::domain::EntityId;

/// Directory, profile, blacklist and people-modal messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UsersMsg {
    /// Explicitly paginated: the directory resets and fetches at `offset`
    DirectoryRequested { query: UserQuery, offset: u32 },
    DirectoryPageLoaded { query: UserQuery, page: Page<User> },
    DirectoryFailed { query: UserQuery, message: String },

    ProfileRequested(EntityId),
    ProfileLoaded(User),
    ProfileFailed { message: String },

    BlacklistRequested { query: BlacklistQuery },
    BlacklistLoadMore,
    BlacklistPageLoaded {
        query: BlacklistQuery,
        page: Page<User>,
    },
    BlacklistFailed {
        query: BlacklistQuery,
        offset: u32,
        message: String,
    },

    PeopleRequested {
        kind: PeopleKind,
        user_id: EntityId,
        query: PeopleQuery,
    },
    PeopleLoadMore {
        kind: PeopleKind,
        user_id: EntityId,
    },
    PeoplePageLoaded {
        kind: PeopleKind,
        user_id: EntityId,
        query: PeopleQuery,
        page: Page<User>,
    },
    PeopleFailed {
        kind: PeopleKind,
        user_id: EntityId,
        query: PeopleQuery,
        offset: u32,
        message: String,
    },
    /// The people modal for `user_id` closed; both keyed slots are evicted
    PeopleClosed { user_id: EntityId },

    BlockedMeLoaded(Vec<EntityId>),
    BlockedByMeLoaded(Vec<EntityId>),
}
