use serde::{Deserialize, Serialize};

use crate::domain::comment::Comment;
use crate::domain::query::{CommentQuery, Page};
use crate::domain::EntityId;

/// Comment listing messages, keyed by the owning post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommentsMsg {
    Requested { post_id: EntityId },
    LoadMore { post_id: EntityId },
    PageLoaded {
        post_id: EntityId,
        query: CommentQuery,
        page: Page<Comment>,
    },
    Failed {
        post_id: EntityId,
        offset: u32,
        message: String,
    },
    /// The post detail closed; the slot for `post_id` is evicted
    Closed { post_id: EntityId },
}
