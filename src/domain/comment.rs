use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::Author;
use crate::domain::{Entity, EntityId};

/// A comment under a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}
