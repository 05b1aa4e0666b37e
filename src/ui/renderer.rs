//! Main UI renderer

use ratatui::{layout::Rect, style::Style, widgets::Block, Frame};

use crate::core::state::AppState;
use crate::ui::layout::LayoutManager;
use crate::ui::theme::Theme;
use crate::ui::widgets::*;

pub struct Renderer;

impl Renderer {
    /// Draw one frame. Reads the state only.
    pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
        let (width, height) = state.viewport;
        let area = Rect::new(0, 0, width, height).intersection(frame.area());
        let metrics = &state.metrics;

        // Clear background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.colors.bg_primary)),
            area,
        );

        let layout = LayoutManager::compute(area, metrics.disks.len());

        frame.render_widget(TitleBar::new(theme), layout.title);
        frame.render_widget(InfoPanel::new(&metrics.host_info, theme), layout.info);

        frame.render_widget(
            UsagePanel::new(
                format!("CPU Usage: {:.2}%", metrics.cpu_percent),
                state.gauges.cpu,
                theme,
            ),
            layout.cpu,
        );
        frame.render_widget(
            UsagePanel::new(
                format!(
                    "Memory: {:.2} GB / {:.2} GB",
                    metrics.mem_used_gb, metrics.mem_total_gb
                ),
                state.gauges.memory,
                theme,
            ),
            layout.memory,
        );

        for (disk, rect) in metrics.disk_entries().zip(layout.disks) {
            frame.render_widget(
                UsagePanel::new(
                    format!(
                        "Disk ({}): {:.2} GB / {:.2} GB",
                        disk.mountpoint, disk.used_gb, disk.total_gb
                    ),
                    state.gauges.disk(&disk.mountpoint),
                    theme,
                ),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{DiskEntry, MetricSnapshot};
    use crate::integrations::system::Usage;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn draw(state: &AppState, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        terminal
            .draw(|frame| Renderer::render(frame, state, &Theme::default()))
            .expect("draw");
        terminal.backend().buffer().clone()
    }

    fn screen(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn initial_frame_shows_zeroes() {
        let state = AppState::new(MetricSnapshot::default(), (100, 20));

        let text = screen(&draw(&state, 100, 20));

        assert!(text.contains("System Monitor"));
        assert!(text.contains("CPU Usage: 0.00%"));
        assert!(text.contains("Memory: 0.00 GB / 0.00 GB"));
        assert!(!text.contains("Disk ("));
    }

    #[test]
    fn renders_host_text_and_disks_in_two_columns() {
        let mut metrics = MetricSnapshot {
            cpu_percent: 12.346,
            host_info: "Hostname: box\nOS: ubuntu\nUptime: 0 days 0 hrs 0 min 5 s".into(),
            ..Default::default()
        };
        for (mount, used) in [("/", 2u64), ("/home", 1), ("/boot", 0)] {
            metrics.disks.insert(
                mount.to_string(),
                DiskEntry::new(mount, Usage::new(used << 30, 4 << 30)),
            );
        }
        let state = AppState::new(metrics, (100, 30));

        let buf = draw(&state, 100, 30);
        let text = screen(&buf);

        assert!(text.contains("Hostname: box"));
        assert!(text.contains("OS: ubuntu"));
        assert!(text.contains("CPU Usage: 12.35%"));

        let lines: Vec<&str> = text.lines().collect();
        let root = lines
            .iter()
            .position(|l| l.contains("Disk (/): 2.00 GB / 4.00 GB"))
            .expect("root disk rendered");
        assert!(lines[root].contains("Disk (/home): 1.00 GB / 4.00 GB"));

        let boot = lines
            .iter()
            .position(|l| l.contains("Disk (/boot): 0.00 GB / 4.00 GB"))
            .expect("third disk rendered");
        assert!(boot > root);
        assert!(lines[boot].find("Disk (/boot)") < lines[root].find("Disk (/home)"));
    }

    #[test]
    fn small_viewport_does_not_panic() {
        let mut metrics = MetricSnapshot::default();
        metrics
            .disks
            .insert("/".into(), DiskEntry::new("/", Usage::new(1, 2)));

        draw(&AppState::new(metrics, (10, 3)), 10, 3);
    }

    #[test]
    fn lays_out_within_the_viewport() {
        let state = AppState::new(MetricSnapshot::default(), (40, 12));

        let buf = draw(&state, 100, 20);

        let text = screen(&buf);
        assert!(text.contains("CPU Usage: 0.00%"));
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                if x >= 40 || y >= 12 {
                    let symbol = buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" ");
                    assert_eq!(symbol, " ", "cell ({}, {}) is outside the viewport", x, y);
                }
            }
        }
    }
}
