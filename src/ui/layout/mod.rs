//! Layout management system

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const TITLE_HEIGHT: u16 = 1;
/// Three lines of host text plus borders.
pub const INFO_HEIGHT: u16 = 5;
/// Label and gauge plus borders.
pub const PANEL_HEIGHT: u16 = 4;

/// Computed rects for every panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedLayout {
    pub title: Rect,
    pub info: Rect,
    pub cpu: Rect,
    pub memory: Rect,
    /// One rect per disk that fits, in disk order.
    pub disks: Vec<Rect>,
}

pub struct LayoutManager;

impl LayoutManager {
    /// Stack title, info and the CPU/memory row, then lay disks out in two
    /// columns: even indices on the left, odd indices on the right.
    pub fn compute(area: Rect, disk_count: usize) -> ComputedLayout {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Length(INFO_HEIGHT),
                Constraint::Length(PANEL_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        let [cpu, memory] = Self::halves(rows[2]);
        let [left, right] = Self::halves(rows[3]);

        let disks = (0..disk_count)
            .map_while(|index| {
                let column = if index % 2 == 0 { left } else { right };
                Self::stacked(column, index / 2)
            })
            .collect();

        ComputedLayout {
            title: rows[0],
            info: rows[1],
            cpu,
            memory,
            disks,
        }
    }

    fn halves(area: Rect) -> [Rect; 2] {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        [chunks[0], chunks[1]]
    }

    /// The `slot`-th panel of a column, or `None` once it would overflow.
    fn stacked(column: Rect, slot: usize) -> Option<Rect> {
        let offset = u16::try_from(slot).ok()?.checked_mul(PANEL_HEIGHT)?;
        let y = column.y.checked_add(offset)?;
        if y.checked_add(PANEL_HEIGHT)? > column.bottom() {
            return None;
        }
        Some(Rect {
            x: column.x,
            y,
            width: column.width,
            height: PANEL_HEIGHT,
        })
    }
}
