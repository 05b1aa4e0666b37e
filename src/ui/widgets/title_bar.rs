//! Title bar widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::Theme;

pub const TITLE: &str = "System Monitor";

pub struct TitleBar<'a> {
    theme: &'a Theme,
}

impl<'a> TitleBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl<'a> Widget for TitleBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.styles.title);

        let line = Line::from(Span::styled(TITLE, self.theme.styles.title));
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
