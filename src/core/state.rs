//! Application state owned by the event loop

use indexmap::IndexMap;

use crate::core::events::Event;
use crate::core::reconcile::Command;
use crate::integrations::system::{MetricsError, Usage};
use crate::ui::widgets::progress::{ProgressModel, ProgressUpdate};

/// `used / total`, clamped to `0..=1`; a zero or invalid total yields 0.
pub fn usage_ratio(used: f64, total: f64) -> f64 {
    if total > 0.0 && used.is_finite() && total.is_finite() {
        (used / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// One mounted filesystem, keyed by mount point.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskEntry {
    pub mountpoint: String,
    pub used_gb: f64,
    pub total_gb: f64,
}

impl DiskEntry {
    pub fn new(mountpoint: impl Into<String>, usage: Usage) -> Self {
        Self {
            mountpoint: mountpoint.into(),
            used_gb: usage.used_gb(),
            total_gb: usage.total_gb(),
        }
    }

    pub fn ratio(&self) -> f64 {
        usage_ratio(self.used_gb, self.total_gb)
    }
}

/// Latest known metric values.
///
/// Disks are kept in discovery order. Entries are added and updated but
/// never removed, so a mount point that disappears keeps its last reading.
#[derive(Debug, Clone, Default)]
pub struct MetricSnapshot {
    pub cpu_percent: f64,
    pub mem_used_gb: f64,
    pub mem_total_gb: f64,
    pub disks: IndexMap<String, DiskEntry>,
    pub host_info: String,
    pub last_error: Option<MetricsError>,
}

impl MetricSnapshot {
    pub fn memory_ratio(&self) -> f64 {
        usage_ratio(self.mem_used_gb, self.mem_total_gb)
    }

    pub fn disk_entries(&self) -> impl Iterator<Item = &DiskEntry> {
        self.disks.values()
    }
}

/// Progress indicators, one per metric panel
#[derive(Debug, Clone, Default)]
pub struct Gauges {
    pub cpu: ProgressModel,
    pub memory: ProgressModel,
    pub disks: IndexMap<String, ProgressModel>,
}

impl Gauges {
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::SetCpuProgress(ratio) => self.cpu.set_target(*ratio),
            Command::SetMemoryProgress(ratio) => self.memory.set_target(*ratio),
            Command::InitDisk { mountpoint } => {
                self.disks.entry(mountpoint.clone()).or_default();
            }
            Command::SetDiskProgress { mountpoint, ratio } => {
                self.disks
                    .entry(mountpoint.clone())
                    .or_default()
                    .set_target(*ratio);
            }
            Command::RearmTick => {}
        }
    }

    /// Forward an event to every indicator.
    pub fn update(&mut self, event: &Event) -> ProgressUpdate {
        let mut combined = self.cpu.update(event).merge(self.memory.update(event));
        for gauge in self.disks.values_mut() {
            combined = combined.merge(gauge.update(event));
        }
        combined
    }

    pub fn disk(&self, mountpoint: &str) -> ProgressModel {
        self.disks.get(mountpoint).copied().unwrap_or_default()
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub metrics: MetricSnapshot,
    pub gauges: Gauges,
    /// Width and height the renderer lays out into.
    pub viewport: (u16, u16),
}

impl AppState {
    pub fn new(metrics: MetricSnapshot, viewport: (u16, u16)) -> Self {
        Self {
            metrics,
            gauges: Gauges::default(),
            viewport,
        }
    }
}
