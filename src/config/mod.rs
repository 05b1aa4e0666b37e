//! Runtime configuration
//!
//! Defaults cover everything; a TOML file is only read when one is passed
//! explicitly on the command line.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Shortest tick period or CPU window accepted.
pub const MIN_INTERVAL_MS: u64 = 100;
pub const MAX_FRAME_RATE: u16 = 120;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub sampling: SamplingConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sampling.tick_interval_ms < MIN_INTERVAL_MS {
            bail!(
                "tick interval must be at least {} ms, got {}",
                MIN_INTERVAL_MS,
                self.sampling.tick_interval_ms
            );
        }
        if self.sampling.cpu_window_ms < MIN_INTERVAL_MS {
            bail!(
                "CPU sample window must be at least {} ms, got {}",
                MIN_INTERVAL_MS,
                self.sampling.cpu_window_ms
            );
        }
        if !(1..=MAX_FRAME_RATE).contains(&self.display.frame_rate) {
            bail!(
                "frame rate must be between 1 and {}, got {}",
                MAX_FRAME_RATE,
                self.display.frame_rate
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SamplingConfig {
    pub tick_interval_ms: u64,
    pub cpu_window_ms: u64,
}

impl SamplingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            cpu_window_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: String,
    pub frame_rate: u16,
}

impl DisplayConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / u32::from(self.frame_rate.max(1))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "ocean".to_string(),
            frame_rate: 30,
        }
    }
}
