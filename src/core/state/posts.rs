use crate::core::cmd::{ApiRequest, Cmd};
use crate::core::msg::posts::PostsMsg;
use crate::core::state::paged::PagedSlot;
use crate::core::trigger::{Surface, COOLDOWN_MS};
use crate::domain::post::Post;
use crate::domain::query::PostQuery;

/// Posts slice: one slot shared by the feed and profile screens (the query
/// scope tells them apart), plus the post currently open in the detail
/// modal and upload progress while a post is being created.
#[derive(Debug, Clone)]
pub struct PostsState {
    pub slot: PagedSlot<Post, PostQuery>,
    pub current: Option<Post>,
    pub detail_loading: bool,
    pub upload_progress: Option<u8>,
    page_size: u32,
}

impl Default for PostsState {
    fn default() -> Self {
        Self::new(8)
    }
}

impl PostsState {
    pub fn new(page_size: u32) -> Self {
        Self {
            slot: PagedSlot::new(),
            current: None,
            detail_loading: false,
            upload_progress: None,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Surface of the slot under its current query
    pub fn surface(&self) -> Surface {
        match self.slot.query() {
            Some(query) if !query.is_feed => Surface::ProfilePosts,
            _ => Surface::Feed,
        }
    }

    pub fn update(&mut self, msg: PostsMsg) -> Vec<Cmd> {
        match msg {
            PostsMsg::Requested { query } => {
                self.slot.reset(query.clone());
                vec![Cmd::Api(ApiRequest::FetchPosts {
                    query,
                    offset: 0,
                    limit: self.page_size,
                })]
            }
            PostsMsg::LoadMore => {
                let Some(query) = self.slot.query().cloned() else {
                    return vec![];
                };
                if !self.slot.can_load_more() {
                    return vec![];
                }
                self.slot.start_append();
                vec![Cmd::Api(ApiRequest::FetchPosts {
                    query,
                    offset: self.slot.next_offset(),
                    limit: self.page_size,
                })]
            }
            PostsMsg::PageLoaded { query, page } => {
                if !self.slot.matches(&query) {
                    return vec![];
                }
                let appended = page.offset > 0;
                self.slot.apply_page(page);
                if appended {
                    vec![Cmd::ReleaseLatch {
                        surface: self.surface(),
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            PostsMsg::PageFailed { query, offset, .. } => {
                if !self.slot.matches(&query) {
                    return vec![];
                }
                self.slot.apply_failure(offset);
                if offset > 0 {
                    vec![Cmd::ReleaseLatch {
                        surface: self.surface(),
                        delay_ms: COOLDOWN_MS,
                    }]
                } else {
                    vec![]
                }
            }
            PostsMsg::DetailRequested(id) => {
                self.detail_loading = true;
                vec![Cmd::Api(ApiRequest::FetchPost { id })]
            }
            PostsMsg::DetailLoaded(post) => {
                self.current = Some(post);
                self.detail_loading = false;
                vec![]
            }
            PostsMsg::DetailFailed { .. } => {
                self.detail_loading = false;
                vec![]
            }
            PostsMsg::DetailClosed => {
                self.current = None;
                vec![]
            }
            PostsMsg::UploadProgress(progress) => {
                self.upload_progress = Some(progress.min(100));
                vec![]
            }
            PostsMsg::UploadFinished => {
                self.upload_progress = None;
                vec![]
            }
        }
    }
}
