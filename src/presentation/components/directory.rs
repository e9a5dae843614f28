//! Directory screen
//!
//! Searchable, explicitly paginated list of all users.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Padding, Paragraph};
use tui_widget_list::{ListBuilder, ListView};

use crate::core::state::ui::Focus;
use crate::core::state::AppState;
use crate::domain::query::page_numbers;
use crate::presentation::widgets::page_bar::PageBar;
use crate::presentation::widgets::user_row::UserRow;

#[derive(Debug, Clone)]
pub struct DirectoryComponent;

impl DirectoryComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, state: &AppState, frame: &mut Frame, area: Rect) {
        let styles = &state.config.config.styles;
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1), // search
                Constraint::Min(0),    // list
                Constraint::Length(1), // page bar
            ],
        )
        .split(area);

        render_search_line(state, frame, layout[0]);
        render_user_list(
            state,
            frame,
            layout[1],
            state.users.directory.items(),
            state.ui.screen_selection,
            "Directory",
        );

        let slot = &state.users.directory;
        let limit = state.users.directory_page_size();
        let pages = page_numbers(
            slot.total_count(),
            limit,
            slot.next_offset().saturating_sub(limit),
        );
        frame.render_widget(
            PageBar::new(pages, styles.style("Directory", "dim")),
            layout[2],
        );
    }
}

impl Default for DirectoryComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Search input line shared by the searchable user lists
pub fn render_search_line(state: &AppState, frame: &mut Frame, area: Rect) {
    let searching = state.ui.focus == Focus::Search;
    let content = &state.ui.search.content;
    let line = if searching {
        format!("/{content}\u{2588}")
    } else if content.is_empty() {
        String::from("/ to search")
    } else {
        format!("/{content}")
    };
    let style = if searching {
        Style::default()
    } else {
        state.config.config.styles.style("Directory", "dim")
    };
    frame.render_widget(Paragraph::new(line).style(style), area);
}

/// User list shared by the directory, blacklist and people modals
pub fn render_user_list(
    state: &AppState,
    frame: &mut Frame,
    area: Rect,
    users: &[crate::domain::user::User],
    selection: Option<usize>,
    style_section: &str,
) {
    let styles = &state.config.config.styles;
    let padding = Padding::horizontal(1);

    if users.is_empty() {
        let empty = Paragraph::new("Nobody here")
            .style(styles.style(style_section, "dim"))
            .alignment(Alignment::Center)
            .block(Block::default().padding(padding));
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<_> = users
        .iter()
        .map(|user| {
            UserRow::new(
                user.clone(),
                styles.style(style_section, "selected"),
                styles.style(style_section, "dim"),
                styles.style(style_section, "accent"),
            )
        })
        .collect();

    let builder = ListBuilder::new(move |context| {
        let mut row = rows[context.index].clone();
        row.highlight = context.is_selected;
        (row, UserRow::HEIGHT)
    });

    let mut list_state = tui_widget_list::ListState::default();
    list_state.select(selection);

    let list = ListView::new(builder, users.len()).block(Block::default().padding(padding));
    frame.render_stateful_widget(list, area, &mut list_state);
}
