use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};

use crate::domain::query::PageNumbers;

/// One-line pager for the explicitly paginated directory.
#[derive(Clone, Copy, Debug)]
pub struct PageBar {
    pages: PageNumbers,
    style: Style,
}

impl PageBar {
    pub fn new(pages: PageNumbers, style: Style) -> Self {
        Self { pages, style }
    }

    fn label(&self) -> String {
        format!(
            "page {}/{}  \u{2190} prev \u{2192} next",
            self.pages.current, self.pages.total
        )
    }
}

impl Widget for PageBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.label())
            .style(self.style)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
