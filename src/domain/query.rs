//! Query snapshots and page envelopes.
//!
//! Every fetch carries the query it was issued under; responses are merged
//! only while that snapshot still matches the slot's current query. Offsets
//! are deliberately not part of any query type.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::domain::EntityId;

/// Sort key accepted by the list endpoints
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum OrderBy {
    #[default]
    #[strum(serialize = "createdAt")]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[strum(serialize = "username")]
    #[serde(rename = "username")]
    Username,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum OrderDirection {
    #[strum(serialize = "ASC")]
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[strum(serialize = "DESC")]
    #[serde(rename = "DESC")]
    Desc,
}

impl OrderDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Scope and ordering of a posts fetch.
///
/// `user_id = None` with `is_feed = true` is the subscription feed;
/// `user_id = Some(id)` is one user's posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostQuery {
    pub user_id: Option<EntityId>,
    pub is_feed: bool,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
}

impl PostQuery {
    pub fn feed() -> Self {
        Self {
            user_id: None,
            is_feed: true,
            order_by: OrderBy::CreatedAt,
            order_direction: OrderDirection::Desc,
        }
    }

    pub fn profile(user_id: EntityId) -> Self {
        Self {
            user_id: Some(user_id),
            is_feed: false,
            order_by: OrderBy::CreatedAt,
            order_direction: OrderDirection::Desc,
        }
    }

    /// Whether a post authored by `author_id` belongs in lists loaded under
    /// this query. Used when deciding to prepend a freshly created post.
    pub fn covers_author(&self, author_id: EntityId, own_id: Option<EntityId>) -> bool {
        match self.user_id {
            Some(user_id) => user_id == author_id,
            None => self.is_feed && own_id == Some(author_id),
        }
    }
}

/// Directory search query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub query: String,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
}

/// Follower/following modal search query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleQuery {
    pub query: String,
}

/// Blacklist search query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistQuery {
    pub query: String,
}

/// Comments are only ever scoped by their post id (the slot key), so the
/// query itself carries nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentQuery;

/// Which relation a people modal shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum PeopleKind {
    #[strum(serialize = "followers")]
    Followers,
    #[strum(serialize = "following")]
    Following,
}

/// One page of a listing response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u32,
    pub offset: u32,
    pub limit: u32,
}

/// Page numbering for explicitly paginated surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumbers {
    pub current: u32,
    pub total: u32,
}

/// Derive 1-based page numbers from an offset-based listing. An empty
/// listing still reports one page so the page bar has something to show.
pub fn page_numbers(total_count: u32, limit: u32, offset: u32) -> PageNumbers {
    if limit == 0 {
        return PageNumbers { current: 1, total: 1 };
    }

    let total = total_count.div_ceil(limit).max(1);
    let current = (offset / limit + 1).min(total);
    PageNumbers { current, total }
}
