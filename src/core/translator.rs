//! Raw event translation
//!
//! Turns raw terminal events into domain messages, using the configured
//! keybindings for the active mode. Pure: no side effects, everything the
//! translation needs comes from the state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::msg::auth::AuthMsg;
use crate::core::msg::system::SystemMsg;
use crate::core::msg::ui::UiMsg;
use crate::core::msg::Msg;
use crate::core::raw_msg::RawMsg;
use crate::core::state::ui::{Focus, Modal, Screen};
use crate::core::state::AppState;
use crate::domain::query::PeopleKind;
use crate::presentation::config::keybindings::{KeyAction, Mode};

pub fn translate_raw_to_domain(raw: RawMsg, state: &AppState) -> Vec<Msg> {
    match raw {
        RawMsg::Key(key) => translate_key_event(key, state),
        RawMsg::Resize(width, height) => vec![Msg::Ui(UiMsg::Resize(width, height))],
        RawMsg::Error(error) => vec![Msg::System(SystemMsg::ShowError(error))],
        // frequent events carry no domain meaning
        RawMsg::Tick | RawMsg::Render => vec![],
    }
}

/// Active keybinding mode for the current screen/modal
pub fn mode_for(state: &AppState) -> Mode {
    if let Some(modal) = state.ui.modal {
        return match modal {
            Modal::People { .. } => Mode::PeopleList,
            Modal::PostDetail(_) => Mode::PostDetail,
            Modal::Compose(_) => Mode::Compose,
        };
    }
    match state.ui.screen {
        Screen::Login => Mode::Login,
        Screen::Verify => Mode::Verify,
        Screen::Feed => Mode::Feed,
        Screen::Directory => Mode::Directory,
        Screen::Profile(_) => Mode::Profile,
        Screen::Blacklist => Mode::Blacklist,
    }
}

fn translate_key_event(key: KeyEvent, state: &AppState) -> Vec<Msg> {
    // global bindings work everywhere, even while typing
    match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => return vec![Msg::System(SystemMsg::Quit)],
        KeyEvent {
            code: KeyCode::Char('z'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => return vec![Msg::System(SystemMsg::Suspend)],
        _ => {}
    }

    match state.ui.focus {
        Focus::Search => translate_search_keys(key),
        Focus::Editor => translate_editor_keys(key),
        Focus::List => translate_mode_keys(key, state),
    }
}

/// While a search field has focus every key edits it, apart from leaving
fn translate_search_keys(key: KeyEvent) -> Vec<Msg> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => vec![Msg::Ui(UiMsg::SearchClosed)],
        _ => vec![Msg::Ui(UiMsg::SearchKey(key))],
    }
}

/// Compose editor: submit on Ctrl-p, cancel on Esc, everything else goes
/// to the text area.
fn translate_editor_keys(key: KeyEvent) -> Vec<Msg> {
    match key {
        KeyEvent {
            code: KeyCode::Char('p'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => vec![Msg::Ui(UiMsg::ComposeSubmitted)],
        KeyEvent {
            code: KeyCode::Esc, ..
        } => vec![Msg::Ui(UiMsg::ComposeCancelled)],
        _ => vec![Msg::Ui(UiMsg::ComposeKey(key))],
    }
}

fn translate_mode_keys(key: KeyEvent, state: &AppState) -> Vec<Msg> {
    let mode = mode_for(state);

    // the login form and the verify gate are typed into, not bound
    if mode == Mode::Login {
        return translate_login_keys(key);
    }
    if mode == Mode::Verify {
        return translate_verify_keys(key);
    }

    let Some(action) = state.config.config.keybindings.action(mode, &[key]) else {
        return vec![];
    };
    translate_action_to_msg(action, state)
}

fn translate_login_keys(key: KeyEvent) -> Vec<Msg> {
    match key {
        KeyEvent {
            code: KeyCode::Tab, ..
        } => vec![Msg::Ui(UiMsg::LoginFocusNext)],
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => vec![Msg::Ui(UiMsg::LoginSubmitted)],
        KeyEvent {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => vec![Msg::Ui(UiMsg::LoginToggleMode)],
        _ => vec![Msg::Ui(UiMsg::LoginKey(key))],
    }
}

/// Verify gate: plain keys edit the token field, Enter submits it
fn translate_verify_keys(key: KeyEvent) -> Vec<Msg> {
    match key {
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => vec![Msg::Ui(UiMsg::VerifySubmitted)],
        KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => vec![Msg::Auth(AuthMsg::ResendRequested)],
        KeyEvent {
            code: KeyCode::Char('l'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => vec![Msg::Auth(AuthMsg::LoggedOut)],
        _ => vec![Msg::Ui(UiMsg::VerifyKey(key))],
    }
}

fn translate_action_to_msg(action: KeyAction, state: &AppState) -> Vec<Msg> {
    match action {
        KeyAction::Quit => vec![Msg::System(SystemMsg::Quit)],
        KeyAction::Suspend => vec![Msg::System(SystemMsg::Suspend)],
        KeyAction::Up => vec![Msg::Ui(UiMsg::Up)],
        KeyAction::Down => vec![Msg::Ui(UiMsg::Down)],
        KeyAction::Top => vec![Msg::Ui(UiMsg::Top)],
        KeyAction::Bottom => vec![Msg::Ui(UiMsg::Bottom)],
        KeyAction::Open => vec![Msg::Ui(UiMsg::Open)],
        KeyAction::Back => vec![Msg::Ui(UiMsg::Back)],
        KeyAction::Compose => vec![Msg::Ui(UiMsg::OpenCompose)],
        KeyAction::CycleOrder => vec![Msg::Ui(UiMsg::CycleOrder)],
        KeyAction::Refresh => vec![Msg::Ui(UiMsg::Refresh)],
        KeyAction::Search => vec![Msg::Ui(UiMsg::SearchOpened)],
        KeyAction::NextPage => vec![Msg::Ui(UiMsg::NextPage)],
        KeyAction::PrevPage => vec![Msg::Ui(UiMsg::PrevPage)],
        KeyAction::FollowToggle => vec![Msg::Ui(UiMsg::FollowToggle)],
        KeyAction::BlockToggle => vec![Msg::Ui(UiMsg::BlockToggle)],
        KeyAction::Delete => vec![Msg::Ui(UiMsg::Delete)],
        KeyAction::Edit => vec![Msg::Ui(UiMsg::Edit)],
        KeyAction::EditProfile => vec![Msg::Ui(UiMsg::EditProfile)],
        KeyAction::DeleteAccount => vec![Msg::Ui(UiMsg::DeleteAccount)],
        KeyAction::GoDirectory => vec![Msg::Ui(UiMsg::Navigate(Screen::Directory))],
        KeyAction::GoBlacklist => vec![Msg::Ui(UiMsg::Navigate(Screen::Blacklist))],
        KeyAction::GoOwnProfile => match state.auth.current_user_id() {
            Some(id) => vec![Msg::Ui(UiMsg::Navigate(Screen::Profile(id)))],
            None => vec![],
        },
        KeyAction::ShowFollowers => show_people(state, PeopleKind::Followers),
        KeyAction::ShowFollowing => show_people(state, PeopleKind::Following),
        KeyAction::Logout => vec![Msg::Auth(AuthMsg::LoggedOut)],
    }
}

/// Follower/following modals open for the profile being viewed
fn show_people(state: &AppState, kind: PeopleKind) -> Vec<Msg> {
    match state.ui.screen {
        Screen::Profile(user_id) => vec![Msg::Ui(UiMsg::OpenPeople { kind, user_id })],
        _ => vec![],
    }
}
