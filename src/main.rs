//! Hoststat - live terminal dashboard for the local host
//!
//! Shows CPU utilisation, memory, per-mount disk usage and host identity,
//! refreshed continuously until `q` or `Ctrl+C`.

mod config;
mod core;
mod integrations;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::core::app::App;

#[derive(Parser)]
#[command(name = "hoststat")]
#[command(author = "Hoststat Contributors")]
#[command(version)]
#[command(about = "Live terminal dashboard for CPU, memory, disk and host metrics", long_about = None)]
struct Cli {
    /// Memory/disk/host refresh period in milliseconds
    #[arg(long, value_name = "MS")]
    tick_interval: Option<u64>,

    /// CPU sampling window in milliseconds
    #[arg(long, value_name = "MS")]
    cpu_window: Option<u64>,

    /// Colour theme (ocean, tokyo-night, nord)
    #[arg(long)]
    theme: Option<String>,

    /// Gauge animation frames per second
    #[arg(long, value_name = "FPS")]
    frame_rate: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(ms) = self.tick_interval {
            config.sampling.tick_interval_ms = ms;
        }
        if let Some(ms) = self.cpu_window {
            config.sampling.cpu_window_ms = ms;
        }
        if let Some(theme) = self.theme {
            config.display.theme = theme;
        }
        if let Some(fps) = self.frame_rate {
            config.display.frame_rate = fps;
        }

        config.validate()?;
        Ok(config)
    }
}

fn setup_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // The terminal belongs to the UI, so logs go to a file
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hoststat")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "hoststat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive for the duration of the program
    let _logging_guard = setup_logging(cli.verbose)?;

    let config = cli.into_config()?;
    tracing::info!(?config, "starting dashboard");

    let mut app = App::new(config)?;
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "hoststat",
            "--tick-interval",
            "500",
            "--cpu-window",
            "250",
            "--theme",
            "nord",
        ]);

        let config = cli.into_config().expect("valid flags");

        assert_eq!(config.sampling.tick_interval_ms, 500);
        assert_eq!(config.sampling.cpu_window_ms, 250);
        assert_eq!(config.display.theme, "nord");
        assert_eq!(config.display.frame_rate, 30);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let cli = Cli::parse_from(["hoststat", "--tick-interval", "5"]);

        assert!(cli.into_config().is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["hoststat", "--config", "/nonexistent/hoststat.toml"]);

        assert!(cli.into_config().is_err());
    }
}
