use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

use crate::core::trigger::Debouncer;
use crate::domain::query::PeopleKind;
use crate::domain::EntityId;

/// Top-level screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Login,
    Verify,
    Feed,
    Directory,
    Profile(EntityId),
    Blacklist,
}

/// What a compose modal is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComposeKind {
    Post,
    EditPost(EntityId),
    Comment(EntityId),
    /// Bio in the text area, avatar path on the file line
    EditProfile,
}

/// Modals stacked over the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modal {
    People { kind: PeopleKind, user_id: EntityId },
    PostDetail(EntityId),
    Compose(ComposeKind),
}

/// Where key input is routed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Focus {
    #[default]
    List,
    Search,
    Editor,
}

/// Single-line edit buffer for search fields and the login form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    pub content: String,
    pub cursor: usize,
}

impl LineEdit {
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Returns true when the content changed
    pub fn apply_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.content.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_offset(self.cursor - 1);
                self.content.remove(at);
                self.cursor -= 1;
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.content.chars().count() {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.content.remove(at);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.content.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.content.chars().count();
                false
            }
            _ => false,
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(offset, _)| offset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginField {
    #[default]
    Email,
    Username,
    Password,
}

/// Login/registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub email: LineEdit,
    pub username: LineEdit,
    pub password: LineEdit,
    pub focused: LoginField,
}

impl LoginForm {
    pub fn focused_field_mut(&mut self) -> &mut LineEdit {
        match self.focused {
            LoginField::Email => &mut self.email,
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Advance focus, skipping the username field outside sign-up
    pub fn focus_next(&mut self) {
        self.focused = match (self.focused, self.mode) {
            (LoginField::Email, LoginMode::SignUp) => LoginField::Username,
            (LoginField::Email, LoginMode::SignIn) => LoginField::Password,
            (LoginField::Username, _) => LoginField::Password,
            (LoginField::Password, _) => LoginField::Email,
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::SignUp,
            LoginMode::SignUp => LoginMode::SignIn,
        };
        self.focused = LoginField::Email;
    }
}

/// Compose form for posts and comments.
///
/// The description is edited through a transient `tui_textarea::TextArea`
/// in the presentation layer; the state only holds the pending key queue
/// and the materialized content (same stateless-widget treatment the list
/// widgets get).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeForm {
    pub file_path: LineEdit,
    pub content: String,
    pub cursor: (usize, usize),
    pub pending_keys: Vec<KeyEvent>,
    pub file_focused: bool,
}

impl ComposeForm {
    pub fn clear(&mut self) {
        self.file_path.clear();
        self.content.clear();
        self.cursor = (0, 0);
        self.pending_keys.clear();
        self.file_focused = true;
    }

    /// Load existing text for editing, cursor at the end of it
    pub fn prefill(&mut self, content: &str) {
        self.clear();
        self.content = content.to_string();
        let mut rows = 0;
        let mut last = "";
        for line in content.lines() {
            rows += 1;
            last = line;
        }
        self.cursor = if rows == 0 {
            (0, 0)
        } else {
            (rows - 1, last.chars().count())
        };
        self.file_focused = false;
    }
}

/// UI slice: navigation, selection, focus and input buffers
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub screen: Screen,
    pub modal: Option<Modal>,
    pub screen_selection: Option<usize>,
    pub modal_selection: Option<usize>,
    pub focus: Focus,
    pub search: LineEdit,
    pub login: LoginForm,
    pub compose: ComposeForm,
    pub verify_token: LineEdit,
    /// Armed by the first delete-account press, disarmed by any other key
    pub confirm_delete: bool,
    pub debouncer: Debouncer,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of whichever list currently has focus
    pub fn active_selection(&self) -> Option<usize> {
        if self.modal.is_some() {
            self.modal_selection
        } else {
            self.screen_selection
        }
    }

    pub fn set_active_selection(&mut self, selection: Option<usize>) {
        if self.modal.is_some() {
            self.modal_selection = selection;
        } else {
            self.screen_selection = selection;
        }
    }

    /// Move the active selection up; lists select their first row on first
    /// movement.
    pub fn select_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.active_selection() {
            Some(index) => index.saturating_sub(1),
            None => 0,
        };
        self.set_active_selection(Some(next));
    }

    /// Move the active selection down, clamped to the loaded rows
    pub fn select_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.active_selection() {
            Some(index) => (index + 1).min(len - 1),
            None => 0,
        };
        self.set_active_selection(Some(next));
    }

    pub fn select_top(&mut self, len: usize) {
        if len > 0 {
            self.set_active_selection(Some(0));
        }
    }

    pub fn select_bottom(&mut self, len: usize) {
        if len > 0 {
            self.set_active_selection(Some(len - 1));
        }
    }

    /// Keep the selection inside the loaded rows after removals
    pub fn clamp_selection(&mut self, len: usize) {
        let clamped = match (self.active_selection(), len) {
            (_, 0) => None,
            (Some(index), len) => Some(index.min(len - 1)),
            (None, _) => None,
        };
        self.set_active_selection(clamped);
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
        self.modal_selection = None;
        if matches!(modal, Modal::Compose(_)) {
            self.focus = Focus::Editor;
        }
    }

    pub fn close_modal(&mut self) -> Option<Modal> {
        self.modal_selection = None;
        self.focus = Focus::List;
        self.search.clear();
        self.modal.take()
    }

    pub fn navigate(&mut self, screen: Screen) {
        self.screen = screen;
        self.modal = None;
        self.screen_selection = None;
        self.modal_selection = None;
        self.focus = Focus::List;
        self.search.clear();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_line_edit_insert_and_backspace() {
        let mut edit = LineEdit::default();

        assert!(edit.apply_key(key(KeyCode::Char('h'))));
        assert!(edit.apply_key(key(KeyCode::Char('i'))));
        assert_eq!(edit.content, "hi");
        assert_eq!(edit.cursor, 2);

        assert!(edit.apply_key(key(KeyCode::Backspace)));
        assert_eq!(edit.content, "h");
        assert_eq!(edit.cursor, 1);
    }

    #[test]
    fn test_line_edit_insert_mid_string() {
        let mut edit = LineEdit::default();
        edit.apply_key(key(KeyCode::Char('a')));
        edit.apply_key(key(KeyCode::Char('c')));
        edit.apply_key(key(KeyCode::Left));

        edit.apply_key(key(KeyCode::Char('b')));

        assert_eq!(edit.content, "abc");
        assert_eq!(edit.cursor, 2);
    }

    #[test]
    fn test_line_edit_multibyte() {
        let mut edit = LineEdit::default();
        edit.apply_key(key(KeyCode::Char('日')));
        edit.apply_key(key(KeyCode::Char('本')));

        assert!(edit.apply_key(key(KeyCode::Backspace)));
        assert_eq!(edit.content, "日");
    }

    #[test]
    fn test_line_edit_backspace_at_start_is_noop() {
        let mut edit = LineEdit::default();
        assert!(!edit.apply_key(key(KeyCode::Backspace)));
        assert_eq!(edit.content, "");
    }

    #[test]
    fn test_login_form_focus_skips_username_when_signing_in() {
        let mut form = LoginForm::default();

        form.focus_next();
        assert_eq!(form.focused, LoginField::Password);
        form.focus_next();
        assert_eq!(form.focused, LoginField::Email);

        form.toggle_mode();
        form.focus_next();
        assert_eq!(form.focused, LoginField::Username);
        form.focus_next();
        assert_eq!(form.focused, LoginField::Password);
    }

    #[test]
    fn test_compose_prefill_places_cursor_at_end() {
        let mut form = ComposeForm::default();
        form.file_path.content = "old.jpg".to_string();

        form.prefill("line one\nsecond");

        assert_eq!(form.content, "line one\nsecond");
        assert_eq!(form.cursor, (1, 6));
        assert_eq!(form.file_path.content, "");
        assert!(!form.file_focused);

        form.prefill("");
        assert_eq!(form.cursor, (0, 0));
    }

    #[test]
    fn test_selection_moves_clamped() {
        let mut ui = UiState::new();

        ui.select_down(3);
        assert_eq!(ui.screen_selection, Some(0));
        ui.select_down(3);
        ui.select_down(3);
        ui.select_down(3);
        assert_eq!(ui.screen_selection, Some(2));

        ui.select_up(3);
        assert_eq!(ui.screen_selection, Some(1));

        ui.select_top(3);
        assert_eq!(ui.screen_selection, Some(0));
        ui.select_bottom(3);
        assert_eq!(ui.screen_selection, Some(2));
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut ui = UiState::new();
        ui.select_down(0);
        assert_eq!(ui.screen_selection, None);
    }

    #[test]
    fn test_clamp_selection_after_removal() {
        let mut ui = UiState::new();
        ui.screen_selection = Some(4);

        ui.clamp_selection(3);
        assert_eq!(ui.screen_selection, Some(2));

        ui.clamp_selection(0);
        assert_eq!(ui.screen_selection, None);
    }

    #[test]
    fn test_modal_selection_is_separate() {
        let mut ui = UiState::new();
        ui.screen_selection = Some(2);

        ui.open_modal(Modal::PostDetail(9));
        ui.select_down(5);
        assert_eq!(ui.modal_selection, Some(0));
        assert_eq!(ui.screen_selection, Some(2));

        let closed = ui.close_modal();
        assert_eq!(closed, Some(Modal::PostDetail(9)));
        assert_eq!(ui.modal_selection, None);
        assert_eq!(ui.screen_selection, Some(2));
    }

    #[test]
    fn test_navigate_resets_view_state() {
        let mut ui = UiState::new();
        ui.screen_selection = Some(3);
        ui.focus = Focus::Search;
        ui.search.apply_key(key(KeyCode::Char('x')));
        ui.open_modal(Modal::PostDetail(1));

        ui.navigate(Screen::Directory);

        assert_eq!(ui.screen, Screen::Directory);
        assert_eq!(ui.modal, None);
        assert_eq!(ui.screen_selection, None);
        assert_eq!(ui.focus, Focus::List);
        assert_eq!(ui.search.content, "");
    }
}
