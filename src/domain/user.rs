use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Entity, EntityId};

/// Remote file reference (avatars, post media)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Compact author record embedded in posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: EntityId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<FileRef>,
}

/// A platform user as returned by `/users` endpoints.
///
/// Relationship flags (`is_followed_by_me`, `blocked_by_me`, `blocked_me`)
/// default to `false` when the server omits them. Counts are optional:
/// list endpoints do not include them, the profile endpoint does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<FileRef>,
    #[serde(default)]
    pub is_followed_by_me: bool,
    #[serde(default)]
    pub blocked_by_me: bool,
    #[serde(default)]
    pub blocked_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribers_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions_count: Option<u32>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

impl User {
    /// Handle shown in lists and headers
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }

    /// Mark as followed, bumping the follower count when known
    pub fn mark_followed(&mut self) {
        self.is_followed_by_me = true;
        if let Some(count) = self.subscribers_count.as_mut() {
            *count += 1;
        }
    }

    /// Mark as unfollowed, lowering the follower count when known
    pub fn mark_unfollowed(&mut self) {
        self.is_followed_by_me = false;
        if let Some(count) = self.subscribers_count.as_mut() {
            *count = count.saturating_sub(1);
        }
    }

    /// Apply the block flag. A blocked user cannot stay followed, so an
    /// active follow is undone (including its count adjustment).
    pub fn mark_blocked(&mut self) {
        if self.is_followed_by_me {
            self.mark_unfollowed();
        }
        self.blocked_by_me = true;
    }

    /// Clear the block flag. Does not restore a previous follow.
    pub fn mark_unblocked(&mut self) {
        self.blocked_by_me = false;
        self.is_followed_by_me = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) fn test_user(id: EntityId, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: None,
            bio: None,
            avatar: None,
            is_followed_by_me: false,
            blocked_by_me: false,
            blocked_me: false,
            subscribers_count: Some(10),
            subscriptions_count: Some(3),
            is_verified: true,
            created_at: None,
        }
    }

    #[test]
    fn test_mark_followed_and_unfollowed() {
        let mut user = test_user(1, "ann");

        user.mark_followed();
        assert!(user.is_followed_by_me);
        assert_eq!(user.subscribers_count, Some(11));

        user.mark_unfollowed();
        assert!(!user.is_followed_by_me);
        assert_eq!(user.subscribers_count, Some(10));
    }

    #[test]
    fn test_unfollow_saturates_at_zero() {
        let mut user = test_user(1, "ann");
        user.subscribers_count = Some(0);

        user.mark_unfollowed();
        assert_eq!(user.subscribers_count, Some(0));
    }

    #[test]
    fn test_block_undoes_follow() {
        let mut user = test_user(1, "ann");
        user.mark_followed();
        assert_eq!(user.subscribers_count, Some(11));

        user.mark_blocked();
        assert!(user.blocked_by_me);
        assert!(!user.is_followed_by_me);
        assert_eq!(user.subscribers_count, Some(10));
    }

    #[test]
    fn test_block_without_follow_keeps_count() {
        let mut user = test_user(1, "ann");

        user.mark_blocked();
        assert!(user.blocked_by_me);
        assert_eq!(user.subscribers_count, Some(10));
    }

    #[test]
    fn test_unblock_does_not_restore_follow() {
        let mut user = test_user(1, "ann");
        user.mark_followed();
        user.mark_blocked();

        user.mark_unblocked();
        assert!(!user.blocked_by_me);
        assert!(!user.is_followed_by_me);
    }

    #[test]
    fn test_deserialize_with_missing_flags() {
        let user: User = serde_json::from_str(r#"{"id": 7, "username": "bob"}"#).unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.username, "bob");
        assert!(!user.is_followed_by_me);
        assert!(!user.blocked_by_me);
        assert_eq!(user.subscribers_count, None);
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r#"{
            "id": 3,
            "username": "carol",
            "isFollowedByMe": true,
            "blockedByMe": false,
            "subscribersCount": 42,
            "isVerified": true,
            "avatar": {"url": "https://cdn.example/a.png", "mimeType": "image/png"}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert!(user.is_followed_by_me);
        assert_eq!(user.subscribers_count, Some(42));
        assert!(user.is_verified);
        assert_eq!(
            user.avatar.as_ref().map(|a| a.url.as_str()),
            Some("https://cdn.example/a.png")
        );
    }

    #[test]
    fn test_handle() {
        assert_eq!(test_user(1, "ann").handle(), "@ann");
    }
}
