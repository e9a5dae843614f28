//! Mutation reconciliation
//!
//! A confirmed server-side mutation is fanned out to every loaded
//! collection in one pure pass, instead of refetching the affected lists.
//! All patch rules are idempotent: replaying a mutation leaves the state
//! unchanged.

use serde::{Deserialize, Serialize};

use crate::core::state::AppState;
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::EntityId;

/// A mutation the server has confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    Followed { user_id: EntityId },
    Unfollowed { user_id: EntityId },
    Blocked { user_id: EntityId },
    Unblocked { user_id: EntityId },
    PostCreated(Post),
    PostDeleted { post_id: EntityId },
    PostUpdated(Post),
    CommentAdded { post_id: EntityId, comment: Comment },
    CommentUpdated { post_id: EntityId, comment: Comment },
    CommentDeleted {
        post_id: EntityId,
        comment_id: EntityId,
    },
}

/// Apply one mutation to every loaded view of the affected entity
pub fn reconcile(mut state: AppState, mutation: &Mutation) -> AppState {
    match mutation {
        // keyed relation slots are deliberately untouched by follow
        // mutations; their rows refetch with fresh flags when reopened
        Mutation::Followed { user_id } => {
            patch_user_record(&mut state, *user_id, |user| {
                if !user.is_followed_by_me {
                    user.mark_followed();
                }
            });
        }
        Mutation::Unfollowed { user_id } => {
            patch_user_record(&mut state, *user_id, |user| {
                if user.is_followed_by_me {
                    user.mark_unfollowed();
                }
            });
        }
        Mutation::Blocked { user_id } => {
            patch_user_record(&mut state, *user_id, |user| {
                if !user.blocked_by_me {
                    user.mark_blocked();
                }
            });
            // a blocked user disappears from every loaded relation list
            state.users.followers.patch_all(|slot| slot.remove(*user_id));
            state.users.following.patch_all(|slot| slot.remove(*user_id));
            state.users.blocked_by_me_ids.insert(*user_id);
        }
        Mutation::Unblocked { user_id } => {
            patch_user_record(&mut state, *user_id, |user| {
                user.mark_unblocked();
            });
            state.users.blacklist.remove(*user_id);
            state.users.blocked_by_me_ids.remove(user_id);
        }
        Mutation::PostCreated(post) => {
            let own_id = state.auth.current_user_id();
            let covered = state
                .posts
                .slot
                .query()
                .is_some_and(|query| query.covers_author(post.author.id, own_id));
            if covered {
                state.posts.slot.prepend(post.clone());
            }
        }
        Mutation::PostDeleted { post_id } => {
            state.posts.slot.remove(*post_id);
            if state.posts.current.as_ref().is_some_and(|post| post.id == *post_id) {
                state.posts.current = None;
            }
            state.comments.by_post.evict(*post_id);
        }
        Mutation::PostUpdated(post) => {
            state.posts.slot.replace(post.clone());
            if state.posts.current.as_ref().is_some_and(|current| current.id == post.id) {
                state.posts.current = Some(post.clone());
            }
        }
        Mutation::CommentAdded { post_id, comment } => {
            let fresh = state
                .comments
                .by_post
                .get(*post_id)
                .is_none_or(|slot| !slot.contains(comment.id));
            state
                .comments
                .by_post
                .patch_existing(*post_id, |slot| slot.append(comment.clone()));
            if fresh {
                bump_comment_counts(&mut state, *post_id, 1);
            }
        }
        Mutation::CommentUpdated { post_id, comment } => {
            state
                .comments
                .by_post
                .patch_existing(*post_id, |slot| slot.replace(comment.clone()));
        }
        Mutation::CommentDeleted {
            post_id,
            comment_id,
        } => {
            let present = state
                .comments
                .by_post
                .get(*post_id)
                .is_some_and(|slot| slot.contains(*comment_id));
            state
                .comments
                .by_post
                .patch_existing(*post_id, |slot| slot.remove(*comment_id));
            if present {
                bump_comment_counts(&mut state, *post_id, -1);
            }
        }
    }

    state
}

/// Patch every flat occurrence of a user record: the open profile, the
/// directory and the blacklist
fn patch_user_record(
    state: &mut AppState,
    user_id: EntityId,
    patch: impl Fn(&mut crate::domain::user::User),
) {
    if let Some(profile) = state.users.profile.as_mut() {
        if profile.id == user_id {
            patch(profile);
        }
    }
    state.users.directory.patch(user_id, &patch);
    state.users.blacklist.patch(user_id, &patch);
}

fn bump_comment_counts(state: &mut AppState, post_id: EntityId, delta: i32) {
    let adjust = |post: &mut Post| {
        if delta > 0 {
            post.bump_comments_count();
        } else {
            post.drop_comments_count();
        }
    };
    state.posts.slot.patch(post_id, adjust);
    if let Some(current) = state.posts.current.as_mut() {
        if current.id == post_id {
            adjust(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::query::{BlacklistQuery, Page, PeopleQuery, PostQuery, UserQuery};
    use crate::domain::user::{Author, FileRef, User};

    fn test_user(id: EntityId) -> User {
        User {
            id,
            username: format!("user-{id}"),
            email: None,
            bio: None,
            avatar: None,
            is_followed_by_me: false,
            blocked_by_me: false,
            blocked_me: false,
            subscribers_count: Some(10),
            subscriptions_count: Some(5),
            is_verified: true,
            created_at: None,
        }
    }

    fn test_post(id: EntityId, author_id: EntityId) -> Post {
        Post {
            id,
            author: Author {
                id: author_id,
                username: format!("user-{author_id}"),
                avatar: None,
            },
            file: FileRef {
                url: "u".to_string(),
                mime_type: None,
            },
            description: None,
            comments_count: Some(2),
            created_at: Utc::now(),
        }
    }

    fn test_comment(id: EntityId) -> Comment {
        Comment {
            id,
            author: Author {
                id: 1,
                username: "ann".to_string(),
                avatar: None,
            },
            content: "c".to_string(),
            created_at: Utc::now(),
        }
    }

    fn user_page(ids: &[EntityId]) -> Page<User> {
        Page {
            items: ids.iter().copied().map(test_user).collect(),
            total_count: ids.len() as u32,
            offset: 0,
            limit: 10,
        }
    }

    #[test]
    fn test_follow_patches_profile_and_directory() {
        let mut state = AppState::default();
        state.users.profile = Some(test_user(2));
        state.users.directory.reset(UserQuery::default());
        state.users.directory.apply_page(user_page(&[1, 2, 3]));

        let state = reconcile(state, &Mutation::Followed { user_id: 2 });
        // replay must be a no-op
        let state = reconcile(state, &Mutation::Followed { user_id: 2 });

        let profile = state.users.profile.as_ref().unwrap();
        assert!(profile.is_followed_by_me);
        assert_eq!(profile.subscribers_count, Some(11));
        assert!(state.users.directory.items()[1].is_followed_by_me);
        assert!(!state.users.directory.items()[0].is_followed_by_me);
    }

    #[test]
    fn test_block_removes_from_relation_slots_and_forces_unfollow() {
        let mut state = AppState::default();
        let mut followed = test_user(2);
        followed.mark_followed();
        state.users.profile = Some(followed);
        state.users.followers.slot_mut(9).reset(PeopleQuery::default());
        state.users.followers.slot_mut(9).apply_page(user_page(&[2, 3]));
        state.users.following.slot_mut(9).reset(PeopleQuery::default());
        state.users.following.slot_mut(9).apply_page(user_page(&[2]));

        let state = reconcile(state, &Mutation::Blocked { user_id: 2 });
        let state = reconcile(state, &Mutation::Blocked { user_id: 2 });

        let profile = state.users.profile.as_ref().unwrap();
        assert!(profile.blocked_by_me);
        assert!(!profile.is_followed_by_me);
        assert_eq!(profile.subscribers_count, Some(10));

        let followers = state.users.followers.get(9).unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers.total_count(), 1);
        assert_eq!(state.users.following.get(9).unwrap().len(), 0);
        assert!(state.users.blocked_by_me_ids.contains(&2));
    }

    #[test]
    fn test_unblock_removes_from_blacklist() {
        let mut state = AppState::default();
        state.users.blacklist.reset(BlacklistQuery::default());
        state.users.blacklist.apply_page(Page {
            items: (1..=5).map(test_user).collect(),
            total_count: 5,
            offset: 0,
            limit: 12,
        });
        state.users.blocked_by_me_ids.insert(3);

        let state = reconcile(state, &Mutation::Unblocked { user_id: 3 });
        let state = reconcile(state, &Mutation::Unblocked { user_id: 3 });

        assert_eq!(state.users.blacklist.len(), 4);
        assert_eq!(state.users.blacklist.total_count(), 4);
        assert!(!state.users.blocked_by_me_ids.contains(&3));
    }

    #[test]
    fn test_post_created_prepended_when_scope_matches() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::profile(7));
        state.posts.slot.apply_page(Page {
            items: vec![test_post(1, 7)],
            total_count: 1,
            offset: 0,
            limit: 8,
        });

        let state = reconcile(state, &Mutation::PostCreated(test_post(2, 7)));

        assert_eq!(state.posts.slot.len(), 2);
        assert_eq!(state.posts.slot.items()[0].id, 2);
        assert_eq!(state.posts.slot.total_count(), 2);
    }

    #[test]
    fn test_post_created_skipped_when_scope_differs() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::profile(7));

        let state = reconcile(state, &Mutation::PostCreated(test_post(2, 8)));

        assert!(state.posts.slot.is_empty());
    }

    #[test]
    fn test_post_deleted_clears_detail_and_comments() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::feed());
        state.posts.slot.apply_page(Page {
            items: vec![test_post(1, 2), test_post(2, 2)],
            total_count: 2,
            offset: 0,
            limit: 8,
        });
        state.posts.current = Some(test_post(1, 2));
        state.comments.by_post.slot_mut(1).append(test_comment(5));

        let state = reconcile(state, &Mutation::PostDeleted { post_id: 1 });

        assert_eq!(state.posts.slot.len(), 1);
        assert_eq!(state.posts.current, None);
        assert!(state.comments.by_post.get(1).is_none());
    }

    #[test]
    fn test_post_updated_replaces_in_place() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::feed());
        state.posts.slot.apply_page(Page {
            items: vec![test_post(1, 2), test_post(2, 2)],
            total_count: 2,
            offset: 0,
            limit: 8,
        });

        let mut updated = test_post(1, 2);
        updated.description = Some("edited".to_string());
        let state = reconcile(state, &Mutation::PostUpdated(updated));

        assert_eq!(
            state.posts.slot.items()[0].description.as_deref(),
            Some("edited")
        );
        assert_eq!(state.posts.slot.items()[1].id, 2);
    }

    #[test]
    fn test_comment_added_mirrors_count() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::feed());
        state.posts.slot.apply_page(Page {
            items: vec![test_post(1, 2)],
            total_count: 1,
            offset: 0,
            limit: 8,
        });
        state.posts.current = Some(test_post(1, 2));
        state.comments.by_post.slot_mut(1).reset(crate::domain::query::CommentQuery);

        let mutation = Mutation::CommentAdded {
            post_id: 1,
            comment: test_comment(9),
        };
        let state = reconcile(state, &mutation);
        let state = reconcile(state, &mutation);

        assert_eq!(state.comments.by_post.get(1).unwrap().len(), 1);
        assert_eq!(state.posts.slot.items()[0].comments_count, Some(3));
        assert_eq!(
            state.posts.current.as_ref().unwrap().comments_count,
            Some(3)
        );
    }

    #[test]
    fn test_comment_deleted_mirrors_count() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::feed());
        state.posts.slot.apply_page(Page {
            items: vec![test_post(1, 2)],
            total_count: 1,
            offset: 0,
            limit: 8,
        });
        state.comments.by_post.slot_mut(1).append(test_comment(9));

        let mutation = Mutation::CommentDeleted {
            post_id: 1,
            comment_id: 9,
        };
        let state = reconcile(state, &mutation);
        let state = reconcile(state, &mutation);

        assert_eq!(state.comments.by_post.get(1).unwrap().len(), 0);
        assert_eq!(state.posts.slot.items()[0].comments_count, Some(1));
    }

    #[test]
    fn test_comment_added_without_open_slot_only_bumps_counts() {
        let mut state = AppState::default();
        state.posts.slot.reset(PostQuery::feed());
        state.posts.slot.apply_page(Page {
            items: vec![test_post(1, 2)],
            total_count: 1,
            offset: 0,
            limit: 8,
        });

        let state = reconcile(
            state,
            &Mutation::CommentAdded {
                post_id: 1,
                comment: test_comment(9),
            },
        );

        assert!(state.comments.by_post.is_empty());
        assert_eq!(state.posts.slot.items()[0].comments_count, Some(3));
    }
}
