//! Compose modal
//!
//! Edits post descriptions and comments. The text area widget itself is
//! transient: every frame (and every queued key) rebuilds a
//! `tui_textarea::TextArea` from the form content, so all durable state
//! stays in `ComposeForm`.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};
use tui_textarea::{CursorMove, TextArea};

use crate::core::state::ui::{ComposeKind, Modal};
use crate::core::state::AppState;
use crate::presentation::components::centered_rect;

/// Drain the queued keys through a transient text area and write the
/// resulting content and cursor back into the form.
pub fn process_pending_keys(form: &mut crate::core::state::ui::ComposeForm) {
    if form.pending_keys.is_empty() {
        return;
    }
    let mut textarea = TextArea::from(form.content.lines());
    let (row, col) = form.cursor;
    textarea.move_cursor(CursorMove::Jump(row as u16, col as u16));
    for key in form.pending_keys.drain(..) {
        textarea.input(key);
    }
    form.content = textarea.lines().join("\n");
    form.cursor = textarea.cursor();
}

#[derive(Debug, Clone)]
pub struct ComposeComponent;

impl ComposeComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let Some(Modal::Compose(kind)) = state.ui.modal else {
            return;
        };

        let modal_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, modal_area);

        let title = match kind {
            ComposeKind::Post => "New post",
            ComposeKind::EditPost(_) => "Edit post",
            ComposeKind::EditProfile => "Edit profile",
            ComposeKind::Comment(_) => "New comment",
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        // new posts take a media file, profile edits an avatar
        let has_file = matches!(kind, ComposeKind::Post | ComposeKind::EditProfile);
        let file_label = match kind {
            ComposeKind::EditProfile => "avatar",
            _ => "file",
        };
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(if has_file { 1 } else { 0 }),
                Constraint::Min(1),
                Constraint::Length(1),
            ],
        )
        .split(inner);

        if has_file {
            let form = &state.ui.compose;
            let marker = if form.file_focused { "> " } else { "  " };
            let file_line =
                Paragraph::new(format!("{marker}{file_label}: {}", form.file_path.content));
            frame.render_widget(file_line, layout[0]);
        }

        let mut textarea = TextArea::from(state.ui.compose.content.lines());
        let (row, col) = state.ui.compose.cursor;
        textarea.move_cursor(CursorMove::Jump(row as u16, col as u16));
        if state.ui.compose.file_focused {
            // cursor stays on the file line
            textarea.set_cursor_style(Style::default());
        }
        frame.render_widget(&textarea, layout[1]);

        match state.posts.upload_progress {
            Some(percent) => {
                let gauge = Gauge::default()
                    .ratio(f64::from(percent) / 100.0)
                    .label(format!("uploading {percent}%"));
                frame.render_widget(gauge, layout[2]);
            }
            None => {
                let hint = Paragraph::new("Ctrl-p submit · Esc cancel · Tab switch field")
                    .style(state.config.config.styles.style("Feed", "dim"));
                frame.render_widget(hint, layout[2]);
            }
        }
    }
}

impl Default for ComposeComponent {
    fn default() -> Self {
        Self::new()
    }
}
