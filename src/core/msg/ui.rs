use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};

use crate::core::state::ui::Screen;
use crate::domain::query::PeopleKind;
use crate::domain::EntityId;

/// Navigation, selection and input messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiMsg {
    Tick,
    Render,
    Resize(u16, u16),

    Navigate(Screen),
    Back,

    OpenPostDetail(EntityId),
    OpenPeople { kind: PeopleKind, user_id: EntityId },
    OpenCompose,
    CloseModal,

    Up,
    Down,
    Top,
    Bottom,
    /// Activate the selected row (open a profile or post)
    Open,

    NextPage,
    PrevPage,
    CycleOrder,
    Refresh,

    SearchOpened,
    SearchClosed,
    SearchKey(KeyEvent),

    ComposeKey(KeyEvent),
    ComposeSubmitted,
    ComposeCancelled,

    LoginKey(KeyEvent),
    LoginFocusNext,
    LoginToggleMode,
    LoginSubmitted,

    VerifyKey(KeyEvent),
    VerifySubmitted,

    FollowToggle,
    BlockToggle,
    Delete,
    /// Edit the selected (or open) post, own content only
    Edit,
    EditProfile,
    /// First press arms the confirmation, the second deletes the account
    DeleteAccount,
}
