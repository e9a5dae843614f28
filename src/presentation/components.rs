//! Screen and modal components
//!
//! Components are stateless renderers: each exposes a `view(&AppState,
//! frame, area)` and reads everything it needs from the state. The
//! `Components` collection picks the right screen and stacks any open
//! modal on top.

use ratatui::prelude::*;

use crate::core::state::ui::{Modal, Screen};
use crate::core::state::AppState;

pub mod blacklist;
pub mod compose;
pub mod directory;
pub mod feed;
pub mod login;
pub mod people_list;
pub mod post_detail;
pub mod profile;
pub mod status_bar;
pub mod verify;

pub use status_bar::StatusBarComponent;

/// Collection of all components
pub struct Components {
    pub login: login::LoginComponent,
    pub verify: verify::VerifyComponent,
    pub feed: feed::FeedComponent,
    pub directory: directory::DirectoryComponent,
    pub profile: profile::ProfileComponent,
    pub blacklist: blacklist::BlacklistComponent,
    pub people: people_list::PeopleListComponent,
    pub post_detail: post_detail::PostDetailComponent,
    pub compose: compose::ComposeComponent,
    pub status_bar: StatusBarComponent,
}

impl Components {
    pub fn new() -> Self {
        Self {
            login: login::LoginComponent::new(),
            verify: verify::VerifyComponent::new(),
            feed: feed::FeedComponent::new(),
            directory: directory::DirectoryComponent::new(),
            profile: profile::ProfileComponent::new(),
            blacklist: blacklist::BlacklistComponent::new(),
            people: people_list::PeopleListComponent::new(),
            post_detail: post_detail::PostDetailComponent::new(),
            compose: compose::ComposeComponent::new(),
            status_bar: StatusBarComponent::new(),
        }
    }

    /// Main render entry point
    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let area = frame.area();

        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Min(0),    // Active screen
                Constraint::Length(2), // Status bar
            ],
        )
        .split(area);

        match state.ui.screen {
            Screen::Login => self.login.view(state, frame, layout[0]),
            Screen::Verify => self.verify.view(state, frame, layout[0]),
            Screen::Feed => self.feed.view(state, frame, layout[0]),
            Screen::Directory => self.directory.view(state, frame, layout[0]),
            Screen::Profile(_) => self.profile.view(state, frame, layout[0]),
            Screen::Blacklist => self.blacklist.view(state, frame, layout[0]),
        }

        match state.ui.modal {
            Some(Modal::People { .. }) => self.people.view(state, frame, layout[0]),
            Some(Modal::PostDetail(_)) => self.post_detail.view(state, frame, layout[0]),
            Some(Modal::Compose(_)) => self.compose.view(state, frame, layout[0]),
            None => {}
        }

        self.status_bar.view(state, frame, layout[1]);
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

/// Rectangle centered in `area`, sized as a percentage of it
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::new(
        Direction::Vertical,
        [
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ],
    )
    .split(area);
    let horizontal = Layout::new(
        Direction::Horizontal,
        [
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ],
    )
    .split(vertical[1]);
    horizontal[1]
}
