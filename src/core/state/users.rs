use std::collections::HashSet;

use crate::core::cmd::{ApiRequest, Cmd};
use crate::core::msg::users::UsersMsg;
use crate::core::state::keyed::KeyedSlots;
use crate::core::state::paged::PagedSlot;
use crate::core::trigger::{Surface, COOLDOWN_MS};
use crate::domain::query::{BlacklistQuery, PeopleKind, PeopleQuery, UserQuery};
use crate::domain::user::User;
use crate::domain::EntityId;

/// Users slice: the directory (explicitly paginated), the open profile,
/// the blacklist, per-user follower/following slots, and the two block-id
/// sets kept current by the reconciler.
#[derive(Debug, Clone)]
pub struct UsersState {
    pub directory: PagedSlot<User, UserQuery>,
    pub profile: Option<User>,
    pub profile_loading: bool,
    pub blacklist: PagedSlot<User, BlacklistQuery>,
    pub followers: KeyedSlots<User, PeopleQuery>,
    pub following: KeyedSlots<User, PeopleQuery>,
    pub blocked_me_ids: HashSet<EntityId>,
    pub blocked_by_me_ids: HashSet<EntityId>,
    directory_page_size: u32,
    blacklist_page_size: u32,
    people_page_size: u32,
}

impl Default for UsersState {
    fn default() -> Self {
        Self::new(10, 12, 16)
    }
}

impl UsersState {
    pub fn new(directory_page_size: u32, blacklist_page_size: u32, people_page_size: u32) -> Self {
        Self {
            directory: PagedSlot::new(),
            profile: None,
            profile_loading: false,
            blacklist: PagedSlot::new(),
            followers: KeyedSlots::new(),
            following: KeyedSlots::new(),
            blocked_me_ids: HashSet::new(),
            blocked_by_me_ids: HashSet::new(),
            directory_page_size,
            blacklist_page_size,
            people_page_size,
        }
    }

    pub fn directory_page_size(&self) -> u32 {
        self.directory_page_size
    }

    pub fn people(&self, kind: PeopleKind) -> &KeyedSlots<User, PeopleQuery> {
        match kind {
            PeopleKind::Followers => &self.followers,
            PeopleKind::Following => &self.following,
        }
    }

    pub fn people_mut(&mut self, kind: PeopleKind) -> &mut KeyedSlots<User, PeopleQuery> {
        match kind {
            PeopleKind::Followers => &mut self.followers,
            PeopleKind::Following => &mut self.following,
        }
    }

    pub fn update(&mut self, msg: UsersMsg) -> Vec<Cmd> {
        match msg {
            UsersMsg::DirectoryRequested { query, offset } => {
                self.directory.reset(query.clone());
                vec![Cmd::Api(ApiRequest::FetchUsers {
                    query,
                    offset,
                    limit: self.directory_page_size,
                })]
            }
            UsersMsg::DirectoryPageLoaded { query, page } => {
                if self.directory.matches(&query) {
                    self.directory.apply_page(page);
                }
                vec![]
            }
            UsersMsg::DirectoryFailed { query, .. } => {
                if self.directory.matches(&query) {
                    // the directory always refetches wholesale
                    self.directory.apply_failure(0);
                }
                vec![]
            }

            UsersMsg::ProfileRequested(id) => {
                self.profile = None;
                self.profile_loading = true;
                vec![Cmd::Api(ApiRequest::FetchUser { id })]
            }
            UsersMsg::ProfileLoaded(user) => {
                self.profile = Some(user);
                self.profile_loading = false;
                vec![]
            }
            UsersMsg::ProfileFailed { .. } => {
                self.profile_loading = false;
                vec![]
            }

            UsersMsg::BlacklistRequested { query } => {
                self.blacklist.reset(query.clone());
                vec![Cmd::Api(ApiRequest::FetchBlacklist {
                    query,
                    offset: 0,
                    limit: self.blacklist_page_size,
                })]
            }
            UsersMsg::BlacklistLoadMore => {
                let Some(query) = self.blacklist.query().cloned() else {
                    return vec![];
                };
                if !self.blacklist.can_load_more() {
                    return vec![];
                }
                self.blacklist.start_append();
                vec![Cmd::Api(ApiRequest::FetchBlacklist {
                    query,
                    offset: self.blacklist.next_offset(),
                    limit: self.blacklist_page_size,
                })]
            }
            UsersMsg::BlacklistPageLoaded { query, page } => {
                if !self.blacklist.matches(&query) {
                    return vec![];
                }
                let appended = page.offset > 0;
                self.blacklist.apply_page(page);
                if appended {
                    vec![Cmd::ReleaseLatch {
                        surface: Surface::Blacklist,
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            UsersMsg::BlacklistFailed { query, offset, .. } => {
                if !self.blacklist.matches(&query) {
                    return vec![];
                }
                self.blacklist.apply_failure(offset);
                if offset > 0 {
                    vec![Cmd::ReleaseLatch {
                        surface: Surface::Blacklist,
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }

            UsersMsg::PeopleRequested {
                kind,
                user_id,
                query,
            } => {
                let limit = self.people_page_size;
                self.people_mut(kind).slot_mut(user_id).reset(query.clone());
                vec![Cmd::Api(ApiRequest::FetchPeople {
                    kind,
                    user_id,
                    query,
                    offset: 0,
                    limit,
                })]
            }
            UsersMsg::PeopleLoadMore { kind, user_id } => {
                let limit = self.people_page_size;
                let Some(slot) = self.people_mut(kind).get_mut(user_id) else {
                    return vec![];
                };
                let Some(query) = slot.query().cloned() else {
                    return vec![];
                };
                if !slot.can_load_more() {
                    return vec![];
                }
                slot.start_append();
                let offset = slot.next_offset();
                vec![Cmd::Api(ApiRequest::FetchPeople {
                    kind,
                    user_id,
                    query,
                    offset,
                    limit,
                })]
            }
            UsersMsg::PeoplePageLoaded {
                kind,
                user_id,
                query,
                page,
            } => {
                // late replies for a closed modal must not bring the
                // evicted slot back
                let Some(slot) = self.people_mut(kind).get_mut(user_id) else {
                    return vec![];
                };
                if !slot.matches(&query) {
                    return vec![];
                }
                let appended = page.offset > 0;
                slot.apply_page(page);
                if appended {
                    vec![Cmd::ReleaseLatch {
                        surface: Surface::People(kind, user_id),
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            UsersMsg::PeopleFailed {
                kind,
                user_id,
                query,
                offset,
                ..
            } => {
                let Some(slot) = self.people_mut(kind).get_mut(user_id) else {
                    return vec![];
                };
                if !slot.matches(&query) {
                    return vec![];
                }
                slot.apply_failure(offset);
                if offset > 0 {
                    vec![Cmd::ReleaseLatch {
                        surface: Surface::People(kind, user_id),
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            UsersMsg::PeopleClosed { user_id } => {
                self.followers.evict(user_id);
                self.following.evict(user_id);
                vec![]
            }

            UsersMsg::BlockedMeLoaded(ids) => {
                self.blocked_me_ids = ids.into_iter().collect();
                vec![]
            }
            UsersMsg::BlockedByMeLoaded(ids) => {
                self.blocked_by_me_ids = ids.into_iter().collect();
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::query::Page;

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
            subscribers_count: None,
            subscriptions_count: None,
            is_verified: true,
            created_at: None,
        }
    }

    fn page(ids: &[EntityId], total_count: u32, offset: u32, limit: u32) -> Page<User> {
        Page {
            items: ids.iter().copied().map(test_user).collect(),
            total_count,
            offset,
            limit,
        }
    }

    #[test]
    fn test_directory_explicit_pagination() {
        let mut state = UsersState::new(10, 12, 16);
        let query = UserQuery::default();

        // jump straight to page 3
        let cmds = state.update(UsersMsg::DirectoryRequested {
            query: query.clone(),
            offset: 20,
        });
        assert!(state.directory.is_empty());
        assert_eq!(
            cmds,
            vec![Cmd::Api(ApiRequest::FetchUsers {
                query: query.clone(),
                offset: 20,
                limit: 10
            })]
        );

        state.update(UsersMsg::DirectoryPageLoaded {
            query,
            page: page(&[21, 22, 23], 23, 20, 10),
        });
        assert_eq!(state.directory.len(), 3);
        assert!(!state.directory.is_loading());
    }

    #[test]
    fn test_directory_stale_response_dropped() {
        let mut state = UsersState::new(10, 12, 16);
        let old_query = UserQuery {
            query: "an".to_string(),
            ..Default::default()
        };
        state.update(UsersMsg::DirectoryRequested {
            query: old_query.clone(),
            offset: 0,
        });
        state.update(UsersMsg::DirectoryRequested {
            query: UserQuery {
                query: "ann".to_string(),
                ..Default::default()
            },
            offset: 0,
        });

        state.update(UsersMsg::DirectoryPageLoaded {
            query: old_query,
            page: page(&[1, 2], 2, 0, 10),
        });

        assert!(state.directory.is_empty());
        assert!(state.directory.is_loading());
    }

    #[test]
    fn test_directory_failure_clears_loading() {
        let mut state = UsersState::new(10, 12, 16);
        let query = UserQuery::default();
        state.update(UsersMsg::DirectoryRequested {
            query: query.clone(),
            offset: 10,
        });

        state.update(UsersMsg::DirectoryFailed {
            query,
            message: "boom".to_string(),
        });

        assert!(!state.directory.is_loading());
    }

    #[test]
    fn test_people_slots_are_isolated() {
        let mut state = UsersState::new(10, 12, 16);
        let query = PeopleQuery::default();

        state.update(UsersMsg::PeopleRequested {
            kind: PeopleKind::Followers,
            user_id: 1,
            query: query.clone(),
        });
        state.update(UsersMsg::PeoplePageLoaded {
            kind: PeopleKind::Followers,
            user_id: 1,
            query: query.clone(),
            page: page(&[7, 8], 2, 0, 16),
        });

        state.update(UsersMsg::PeopleRequested {
            kind: PeopleKind::Following,
            user_id: 1,
            query: query.clone(),
        });
        state.update(UsersMsg::PeoplePageLoaded {
            kind: PeopleKind::Following,
            user_id: 1,
            query,
            page: page(&[9], 1, 0, 16),
        });

        assert_eq!(state.followers.get(1).map(PagedSlot::len), Some(2));
        assert_eq!(state.following.get(1).map(PagedSlot::len), Some(1));
    }

    #[test]
    fn test_people_append_schedules_latch_release() {
        let mut state = UsersState::new(10, 12, 16);
        let query = PeopleQuery::default();
        state.update(UsersMsg::PeopleRequested {
            kind: PeopleKind::Followers,
            user_id: 3,
            query: query.clone(),
        });
        state.update(UsersMsg::PeoplePageLoaded {
            kind: PeopleKind::Followers,
            user_id: 3,
            query: query.clone(),
            page: page(
                &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
                20,
                0,
                16,
            ),
        });

        let cmds = state.update(UsersMsg::PeopleLoadMore {
            kind: PeopleKind::Followers,
            user_id: 3,
        });
        assert_eq!(cmds.len(), 1);

        let cmds = state.update(UsersMsg::PeoplePageLoaded {
            kind: PeopleKind::Followers,
            user_id: 3,
            query,
            page: page(&[17, 18, 19, 20], 20, 16, 16),
        });
        assert_eq!(
            cmds,
            vec![Cmd::ReleaseLatch {
                surface: Surface::People(PeopleKind::Followers, 3),
                delay_ms: COOLDOWN_MS
            }]
        );
    }

    #[test]
    fn test_late_people_page_does_not_revive_evicted_slot() {
        let mut state = UsersState::new(10, 12, 16);
        let query = PeopleQuery::default();
        state.update(UsersMsg::PeopleRequested {
            kind: PeopleKind::Followers,
            user_id: 6,
            query: query.clone(),
        });
        state.update(UsersMsg::PeopleClosed { user_id: 6 });

        let cmds = state.update(UsersMsg::PeoplePageLoaded {
            kind: PeopleKind::Followers,
            user_id: 6,
            query: query.clone(),
            page: page(&[1, 2], 2, 0, 16),
        });
        assert!(cmds.is_empty());
        assert!(state.followers.get(6).is_none());

        state.update(UsersMsg::PeopleFailed {
            kind: PeopleKind::Followers,
            user_id: 6,
            query,
            offset: 0,
            message: "boom".to_string(),
        });
        assert!(state.followers.is_empty());
    }

    #[test]
    fn test_people_closed_evicts_both_kinds() {
        let mut state = UsersState::new(10, 12, 16);
        state.followers.slot_mut(5).reset(PeopleQuery::default());
        state.following.slot_mut(5).reset(PeopleQuery::default());

        state.update(UsersMsg::PeopleClosed { user_id: 5 });

        assert!(state.followers.get(5).is_none());
        assert!(state.following.get(5).is_none());
    }

    #[test]
    fn test_blocked_id_sets_replaced() {
        let mut state = UsersState::new(10, 12, 16);

        state.update(UsersMsg::BlockedMeLoaded(vec![1, 2, 2]));
        state.update(UsersMsg::BlockedByMeLoaded(vec![3]));

        assert_eq!(state.blocked_me_ids, HashSet::from([1, 2]));
        assert_eq!(state.blocked_by_me_ids, HashSet::from([3]));
    }

    #[test]
    fn test_profile_lifecycle() {
        let mut state = UsersState::new(10, 12, 16);

        let cmds = state.update(UsersMsg::ProfileRequested(4));
        assert!(state.profile_loading);
        assert_eq!(cmds, vec![Cmd::Api(ApiRequest::FetchUser { id: 4 })]);

        state.update(UsersMsg::ProfileLoaded(test_user(4)));
        assert!(!state.profile_loading);
        assert_eq!(state.profile.as_ref().map(|user| user.id), Some(4));
    }
}
