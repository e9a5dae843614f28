use serde::{Deserialize, Serialize};

use crate::domain::post::Post;
use crate::domain::query::{Page, PostQuery};
use crate::domain::EntityId;

/// Posts listing and detail messages.
///
/// Loaded/failed messages carry the query snapshot their fetch was issued
/// under; stale responses are discarded by the slot's `matches` guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostsMsg {
    /// Fresh fetch at offset 0 under a new query
    Requested { query: PostQuery },
    /// Append the next page if the slot allows it
    LoadMore,
    PageLoaded { query: PostQuery, page: Page<Post> },
    PageFailed {
        query: PostQuery,
        offset: u32,
        message: String,
    },
    DetailRequested(EntityId),
    DetailLoaded(Post),
    DetailFailed { message: String },
    DetailClosed,
    UploadProgress(u8),
    UploadFinished,
}
