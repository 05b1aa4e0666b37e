//! Host metric queries used by the sampling tasks.
//!
//! Every query is fallible and may block. Byte quantities are kept as raw
//! bytes here and converted to gigabytes (2^30) with [`bytes_to_gb`].

use std::path::Path;
use std::time::Duration;

use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};
use thiserror::Error;

/// Bytes in one gigabyte as displayed by the dashboard.
pub const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Which query produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Cpu,
    Memory,
    HostInfo,
    Partitions,
    DiskUsage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("CPU sample failed: {0}")]
    Cpu(String),
    #[error("memory query failed: {0}")]
    Memory(String),
    #[error("host info query failed: {0}")]
    HostInfo(String),
    #[error("partition listing failed: {0}")]
    Partitions(String),
    #[error("disk usage query failed for {mountpoint}: {reason}")]
    DiskUsage { mountpoint: String, reason: String },
}

impl MetricsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cpu(_) => ErrorKind::Cpu,
            Self::Memory(_) => ErrorKind::Memory,
            Self::HostInfo(_) => ErrorKind::HostInfo,
            Self::Partitions(_) => ErrorKind::Partitions,
            Self::DiskUsage { .. } => ErrorKind::DiskUsage,
        }
    }

    /// Fatal errors end the dashboard; the rest are substituted or skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Memory | ErrorKind::HostInfo | ErrorKind::Partitions
        )
    }
}

/// Used/total pair in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Usage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl Usage {
    pub fn new(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            used_bytes,
            total_bytes,
        }
    }

    pub fn used_gb(&self) -> f64 {
        bytes_to_gb(self.used_bytes)
    }

    pub fn total_gb(&self) -> f64 {
        bytes_to_gb(self.total_bytes)
    }
}

/// Host identity and uptime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: String,
    pub platform: String,
    pub uptime_secs: u64,
}

impl HostInfo {
    /// Three-line text shown in the info panel.
    pub fn summary(&self) -> String {
        format!(
            "Hostname: {}\nOS: {}\nUptime: {}",
            self.hostname,
            self.platform,
            format_uptime(self.uptime_secs)
        )
    }
}

/// Formats seconds as `D days H hrs M min S s`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs / 3_600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{} days {} hrs {} min {} s", days, hours, minutes, seconds)
}

/// Queries the dashboard issues against the host.
#[cfg_attr(test, mockall::automock)]
pub trait MetricSource {
    /// Blocks for `window` and returns overall CPU utilisation in percent.
    fn sample_cpu_percent(&mut self, window: Duration) -> Result<f64, MetricsError>;

    fn query_memory(&mut self) -> Result<Usage, MetricsError>;

    /// Mount points of the currently attached filesystems.
    fn list_partitions(&mut self) -> Result<Vec<String>, MetricsError>;

    fn query_disk_usage(&mut self, mountpoint: &str) -> Result<Usage, MetricsError>;

    fn query_host_info(&mut self) -> Result<HostInfo, MetricsError>;
}

/// [`MetricSource`] backed by a reusable `sysinfo` instance.
pub struct SysinfoSource {
    sys: System,
    disks: Disks,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new().with_cpu_usage())
                .with_memory(MemoryRefreshKind::new().with_ram()),
        );

        Self {
            sys,
            disks: Disks::new(),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SysinfoSource {
    fn sample_cpu_percent(&mut self, window: Duration) -> Result<f64, MetricsError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::Cpu("unsupported platform".to_string()));
        }

        // Usage is the delta between two refreshes.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.sys.refresh_cpu_usage();

        if self.sys.cpus().is_empty() {
            return Err(MetricsError::Cpu("no CPUs reported".to_string()));
        }

        let percent = f64::from(self.sys.global_cpu_usage());
        if !percent.is_finite() {
            return Err(MetricsError::Cpu(format!("invalid reading {}", percent)));
        }
        Ok(percent.clamp(0.0, 100.0))
    }

    fn query_memory(&mut self) -> Result<Usage, MetricsError> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        if total == 0 {
            return Err(MetricsError::Memory(
                "total memory reported as zero".to_string(),
            ));
        }
        let used = self.sys.used_memory().min(total);
        Ok(Usage::new(used, total))
    }

    fn list_partitions(&mut self) -> Result<Vec<String>, MetricsError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::Partitions(
                "unsupported platform".to_string(),
            ));
        }

        self.disks.refresh_list();
        Ok(self
            .disks
            .list()
            .iter()
            .map(|disk| disk.mount_point().to_string_lossy().into_owned())
            .collect())
    }

    fn query_disk_usage(&mut self, mountpoint: &str) -> Result<Usage, MetricsError> {
        let failed = |reason: &str| MetricsError::DiskUsage {
            mountpoint: mountpoint.to_string(),
            reason: reason.to_string(),
        };

        let disk = self
            .disks
            .list_mut()
            .iter_mut()
            .find(|disk| disk.mount_point() == Path::new(mountpoint))
            .ok_or_else(|| failed("mount point is not listed"))?;

        if !disk.refresh() {
            return Err(failed("usage refresh failed"));
        }

        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());
        Ok(Usage::new(used, total))
    }

    fn query_host_info(&mut self) -> Result<HostInfo, MetricsError> {
        let hostname = System::host_name()
            .ok_or_else(|| MetricsError::HostInfo("hostname unavailable".to_string()))?;

        let platform = match System::distribution_id() {
            id if !id.is_empty() => id,
            _ => System::name().unwrap_or_else(|| "unknown".to_string()),
        };

        Ok(HostInfo {
            hostname,
            platform,
            uptime_secs: System::uptime(),
        })
    }
}
