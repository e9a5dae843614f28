use crate::core::cmd::{ApiRequest, Cmd};
use crate::core::msg::comments::CommentsMsg;
use crate::core::state::keyed::KeyedSlots;
use crate::core::trigger::{Surface, COOLDOWN_MS};
use crate::domain::comment::Comment;
use crate::domain::query::CommentQuery;

/// Comments slice: one slot per post, created when its detail opens and
/// evicted when it closes.
#[derive(Debug, Clone)]
pub struct CommentsState {
    pub by_post: KeyedSlots<Comment, CommentQuery>,
    page_size: u32,
}

impl Default for CommentsState {
    fn default() -> Self {
        Self::new(20)
    }
}

impl CommentsState {
    pub fn new(page_size: u32) -> Self {
        Self {
            by_post: KeyedSlots::new(),
            page_size,
        }
    }

    pub fn update(&mut self, msg: CommentsMsg) -> Vec<Cmd> {
        match msg {
            CommentsMsg::Requested { post_id } => {
                self.by_post.slot_mut(post_id).reset(CommentQuery);
                vec![Cmd::Api(ApiRequest::FetchComments {
                    post_id,
                    offset: 0,
                    limit: self.page_size,
                })]
            }
            CommentsMsg::LoadMore { post_id } => {
                let Some(slot) = self.by_post.get_mut(post_id) else {
                    return vec![];
                };
                if !slot.can_load_more() {
                    return vec![];
                }
                slot.start_append();
                let offset = slot.next_offset();
                vec![Cmd::Api(ApiRequest::FetchComments {
                    post_id,
                    offset,
                    limit: self.page_size,
                })]
            }
            CommentsMsg::PageLoaded {
                post_id,
                query,
                page,
            } => {
                // a reply landing after the detail closed must not bring
                // the evicted slot back
                let Some(slot) = self.by_post.get_mut(post_id) else {
                    return vec![];
                };
                if !slot.matches(&query) {
                    return vec![];
                }
                let appended = page.offset > 0;
                slot.apply_page(page);
                if appended {
                    vec![Cmd::ReleaseLatch {
                        surface: Surface::Comments(post_id),
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            CommentsMsg::Failed {
                post_id, offset, ..
            } => {
                self.by_post.patch_existing(post_id, |slot| {
                    slot.apply_failure(offset);
                });
                if offset > 0 {
                    vec![Cmd::ReleaseLatch {
                        surface: Surface::Comments(post_id),
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            CommentsMsg::Closed { post_id } => {
                self.by_post.evict(post_id);
                vec![]
            }
        }
    }
}
