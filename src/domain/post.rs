use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{Author, FileRef};
use crate::domain::{Entity, EntityId};

/// A post as returned by `/posts` endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: EntityId,
    pub author: Author,
    pub file: FileRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Post {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

impl Post {
    pub fn bump_comments_count(&mut self) {
        if let Some(count) = self.comments_count.as_mut() {
            *count += 1;
        }
    }

    pub fn drop_comments_count(&mut self) {
        if let Some(count) = self.comments_count.as_mut() {
            *count = count.saturating_sub(1);
        }
    }
}
