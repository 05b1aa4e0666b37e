//! Animated progress indicator

use crate::core::events::Event;

/// Outcome of forwarding an event to a [`ProgressModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Nothing changed.
    Idle,
    /// Moved toward the target and still has distance to cover.
    Animating,
    /// Reached the target on this event.
    Settled,
}

impl ProgressUpdate {
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Animating, _) | (_, Self::Animating) => Self::Animating,
            (Self::Settled, _) | (_, Self::Settled) => Self::Settled,
            _ => Self::Idle,
        }
    }
}

/// Ratio shown by a gauge, eased toward its target on each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressModel {
    target: f64,
    shown: f64,
}

impl ProgressModel {
    const EASING: f64 = 0.3;
    const SNAP: f64 = 0.002;

    pub fn new() -> Self {
        Self::default()
    }

    /// Non-finite ratios are treated as 0.
    pub fn set_target(&mut self, ratio: f64) {
        self.target = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn shown(&self) -> f64 {
        self.shown
    }

    pub fn update(&mut self, event: &Event) -> ProgressUpdate {
        match event {
            Event::Frame => self.step(),
            _ => ProgressUpdate::Idle,
        }
    }

    fn step(&mut self) -> ProgressUpdate {
        let delta = self.target - self.shown;
        if delta == 0.0 {
            return ProgressUpdate::Idle;
        }
        if delta.abs() <= Self::SNAP {
            self.shown = self.target;
            return ProgressUpdate::Settled;
        }
        self.shown += delta * Self::EASING;
        ProgressUpdate::Animating
    }
}
