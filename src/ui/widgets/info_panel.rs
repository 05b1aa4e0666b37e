//! Host information panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::ui::theme::Theme;

pub struct InfoPanel<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> InfoPanel<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }
}

impl<'a> Widget for InfoPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.styles.panel_border);

        // Lines are clipped to the panel, never wrapped.
        let lines: Vec<Line> = self
            .text
            .lines()
            .map(|line| Line::from(Span::styled(line, self.theme.styles.info)))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
