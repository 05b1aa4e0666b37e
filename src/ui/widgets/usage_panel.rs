//! Bordered panel with a label and a gradient gauge

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::ui::theme::Theme;
use crate::ui::widgets::progress::ProgressModel;

/// Room reserved after the bar for the ` 100%` readout.
const PERCENT_WIDTH: u16 = 5;

pub struct UsagePanel<'a> {
    label: String,
    progress: ProgressModel,
    theme: &'a Theme,
}

impl<'a> UsagePanel<'a> {
    pub fn new(label: String, progress: ProgressModel, theme: &'a Theme) -> Self {
        Self {
            label,
            progress,
            theme,
        }
    }

    fn gauge_line(&self, width: u16) -> Line<'static> {
        let bar_width = width.saturating_sub(PERCENT_WIDTH) as usize;
        let ratio = self.progress.shown();
        let filled = ((ratio * bar_width as f64).round() as usize).min(bar_width);

        let mut spans: Vec<Span<'static>> = Vec::with_capacity(bar_width + 1);
        // The gradient is scaled to the filled part, like a fuel gauge.
        let span_len = filled.saturating_sub(1).max(1) as f64;
        for i in 0..filled {
            let color = self.theme.gradient_at(i as f64 / span_len);
            spans.push(Span::styled("█", Style::default().fg(color)));
        }
        if bar_width > filled {
            spans.push(Span::styled(
                "░".repeat(bar_width - filled),
                self.theme.styles.gauge_empty,
            ));
        }
        spans.push(Span::styled(
            format!(" {:>3.0}%", ratio * 100.0),
            self.theme.styles.gauge_percent,
        ));

        Line::from(spans)
    }
}

impl<'a> Widget for UsagePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.styles.panel_border);

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height >= 1 {
            let label = Span::styled(self.label.as_str(), self.theme.styles.panel_label);
            buf.set_span(inner.x, inner.y, &label, inner.width);
        }

        if inner.height >= 2 {
            let gauge = self.gauge_line(inner.width);
            buf.set_line(inner.x, inner.y + 1, &gauge, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::Event;

    fn settled(ratio: f64) -> ProgressModel {
        let mut model = ProgressModel::new();
        model.set_target(ratio);
        while model.shown() != model.target() {
            model.update(&Event::Frame);
        }
        model
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn renders_label_and_half_full_bar() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 17, 4);
        let mut buf = Buffer::empty(area);

        UsagePanel::new("CPU Usage: 50.00%".into(), settled(0.5), &theme)
            .render(area, &mut buf);

        assert_eq!(row(&buf, 0), "╭───────────────╮");
        assert_eq!(row(&buf, 1), "│CPU Usage: 50.0│");
        assert_eq!(row(&buf, 2), "│█████░░░░░  50%│");
        assert_eq!(row(&buf, 3), "╰───────────────╯");
    }

    #[test]
    fn empty_gauge_has_no_fill() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);

        UsagePanel::new("Mem".into(), ProgressModel::new(), &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 2), "│░░░░░   0%│");
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);

        UsagePanel::new("Disk (/)".into(), settled(1.0), &theme).render(area, &mut buf);
    }
}
