//! Background producers for metric refresh events.
//!
//! Two independent tasks feed the event stream:
//!
//! * the tick source sleeps one period, collects memory, host and disk
//!   readings off the async workers, emits [`Event::Tick`] and then waits
//!   until the consumer re-arms it;
//! * the CPU sampler blocks for one sampling window, emits
//!   [`Event::CpuSample`] and immediately starts the next sample.
//!
//! Each task owns its own [`MetricSource`], so nothing is shared between
//! them except the event sender.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

use crate::config::SamplingConfig;
use crate::core::events::Event;
use crate::integrations::system::{HostInfo, MetricSource, MetricsError, Usage};

/// Usage of one partition, or why it could not be read this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionReading {
    pub mountpoint: String,
    pub usage: Result<Usage, MetricsError>,
}

/// Everything one tick observed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSample {
    pub memory: Usage,
    pub host: HostInfo,
    pub partitions: Vec<PartitionReading>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickReading {
    Complete(TickSample),
    /// A fail-fast query failed; later queries of the cycle were not issued.
    Failed(MetricsError),
}

/// Runs the tick queries in order, stopping at the first fatal failure.
pub fn collect_tick<S: MetricSource + ?Sized>(source: &mut S) -> TickReading {
    let memory = match source.query_memory() {
        Ok(memory) => memory,
        Err(err) => return TickReading::Failed(err),
    };
    let host = match source.query_host_info() {
        Ok(host) => host,
        Err(err) => return TickReading::Failed(err),
    };
    let partitions = match collect_partitions(source) {
        Ok(partitions) => partitions,
        Err(err) => return TickReading::Failed(err),
    };

    TickReading::Complete(TickSample {
        memory,
        host,
        partitions,
    })
}

/// Lists partitions and queries each one; per-partition failures are kept
/// in the reading instead of aborting the listing.
pub fn collect_partitions<S: MetricSource + ?Sized>(
    source: &mut S,
) -> Result<Vec<PartitionReading>, MetricsError> {
    let mountpoints = source.list_partitions()?;
    Ok(mountpoints
        .into_iter()
        .map(|mountpoint| {
            let usage = source.query_disk_usage(&mountpoint);
            PartitionReading { mountpoint, usage }
        })
        .collect())
}

/// Handle to the running producers.
pub struct Scheduler {
    rearm: Arc<Notify>,
}

impl Scheduler {
    /// Spawn the tick source and the CPU sampler, each with a fresh source.
    pub fn spawn<S, F>(
        config: &SamplingConfig,
        tx: mpsc::UnboundedSender<Event>,
        mut new_source: F,
    ) -> Self
    where
        S: MetricSource + Send + 'static,
        F: FnMut() -> S,
    {
        let rearm = Arc::new(Notify::new());

        tokio::spawn(tick_source(
            new_source(),
            config.tick_interval(),
            tx.clone(),
            Arc::clone(&rearm),
        ));
        tokio::spawn(cpu_sampler(new_source(), config.cpu_window(), tx));

        tracing::info!(
            tick_ms = config.tick_interval_ms,
            cpu_window_ms = config.cpu_window_ms,
            "sampling started"
        );

        Self { rearm }
    }

    /// Schedule the next tick one period from now.
    pub fn rearm_tick(&self) {
        self.rearm.notify_one();
    }
}

/// Runs `query` on the blocking pool and hands the source back.
async fn run_blocking<S, T, Q>(mut source: S, query: Q) -> Option<(S, T)>
where
    S: Send + 'static,
    T: Send + 'static,
    Q: FnOnce(&mut S) -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(move || {
        let value = query(&mut source);
        (source, value)
    })
    .await
    {
        Ok(pair) => Some(pair),
        Err(err) => {
            tracing::error!(error = %err, "blocking metric query panicked");
            None
        }
    }
}

async fn tick_source<S>(
    mut source: S,
    period: Duration,
    tx: mpsc::UnboundedSender<Event>,
    rearm: Arc<Notify>,
) where
    S: MetricSource + Send + 'static,
{
    loop {
        tokio::time::sleep(period).await;

        let Some((returned, reading)) = run_blocking(source, |s| collect_tick(s)).await else {
            break;
        };
        source = returned;

        if let TickReading::Failed(err) = &reading {
            tracing::error!(error = %err, "tick collection failed");
        }
        if tx.send(Event::Tick(reading)).is_err() {
            break;
        }

        rearm.notified().await;
    }
}

async fn cpu_sampler<S>(mut source: S, window: Duration, tx: mpsc::UnboundedSender<Event>)
where
    S: MetricSource + Send + 'static,
{
    loop {
        let started = Instant::now();
        let Some((returned, result)) =
            run_blocking(source, move |s| s.sample_cpu_percent(window)).await
        else {
            break;
        };
        source = returned;

        // A query that fails fast must not shorten the cadence.
        tokio::time::sleep_until(started + window).await;

        let percent = result.unwrap_or_else(|err| {
            tracing::debug!(error = %err, "CPU sample failed, reporting 0");
            0.0
        });
        if tx.send(Event::CpuSample(percent)).is_err() {
            break;
        }
    }
}
