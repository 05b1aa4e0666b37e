//! Folds refresh events into the metric snapshot.
//!
//! [`reconcile`] is called once per event in arrival order and never blocks:
//! all OS queries already happened in the producers.

use crate::core::events::{Event, EventResult, KeyBindings};
use crate::core::scheduler::{PartitionReading, TickReading, TickSample};
use crate::core::state::{DiskEntry, MetricSnapshot};
use crate::integrations::system::Usage;

/// Follow-up work requested by a reconciliation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetCpuProgress(f64),
    SetMemoryProgress(f64),
    /// A new disk indicator starting at zero.
    InitDisk { mountpoint: String },
    SetDiskProgress { mountpoint: String, ratio: f64 },
    /// Let the tick source schedule its next period.
    RearmTick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub commands: Vec<Command>,
    pub result: EventResult,
}

impl Reconciled {
    fn continue_with(commands: Vec<Command>) -> Self {
        Self {
            commands,
            result: EventResult::Continue,
        }
    }

    fn quit() -> Self {
        Self {
            commands: Vec::new(),
            result: EventResult::Quit,
        }
    }
}

pub fn reconcile(snapshot: &mut MetricSnapshot, event: &Event) -> Reconciled {
    match event {
        Event::CpuSample(percent) => {
            snapshot.cpu_percent = *percent;
            Reconciled::continue_with(vec![Command::SetCpuProgress(percent / 100.0)])
        }
        Event::Tick(TickReading::Complete(sample)) => {
            Reconciled::continue_with(apply_tick(snapshot, sample))
        }
        Event::Tick(TickReading::Failed(err)) if err.is_fatal() => {
            snapshot.last_error = Some(err.clone());
            Reconciled::quit()
        }
        Event::Tick(TickReading::Failed(err)) => {
            tracing::warn!(error = %err, "tick failed with a recoverable error");
            Reconciled::continue_with(vec![Command::RearmTick])
        }
        Event::Key(key) if KeyBindings::is_quit(key) => Reconciled::quit(),
        Event::Key(_) | Event::Resize(..) | Event::Frame => {
            Reconciled::continue_with(Vec::new())
        }
    }
}

fn apply_tick(snapshot: &mut MetricSnapshot, sample: &TickSample) -> Vec<Command> {
    snapshot.mem_used_gb = sample.memory.used_gb();
    snapshot.mem_total_gb = sample.memory.total_gb();
    snapshot.host_info = sample.host.summary();

    let mut commands = Vec::new();
    for partition in &sample.partitions {
        let Ok(usage) = &partition.usage else {
            tracing::debug!(mountpoint = %partition.mountpoint, "skipping unreadable partition");
            continue;
        };
        merge_disk(snapshot, &partition.mountpoint, *usage, &mut commands);
    }

    commands.push(Command::SetMemoryProgress(snapshot.memory_ratio()));
    commands.push(Command::RearmTick);
    commands
}

/// Update the entry for `mountpoint` in place, or append it if unseen.
fn merge_disk(
    snapshot: &mut MetricSnapshot,
    mountpoint: &str,
    usage: Usage,
    commands: &mut Vec<Command>,
) {
    let ratio = match snapshot.disks.get_mut(mountpoint) {
        Some(entry) => {
            entry.used_gb = usage.used_gb();
            entry.total_gb = usage.total_gb();
            entry.ratio()
        }
        None => {
            let entry = DiskEntry::new(mountpoint, usage);
            let ratio = entry.ratio();
            snapshot.disks.insert(mountpoint.to_string(), entry);
            commands.push(Command::InitDisk {
                mountpoint: mountpoint.to_string(),
            });
            ratio
        }
    };

    commands.push(Command::SetDiskProgress {
        mountpoint: mountpoint.to_string(),
        ratio,
    });
}

/// Seed the disk list from the startup discovery pass.
///
/// Indicators are created at zero and pick up their values on the first tick.
pub fn seed_disks(
    snapshot: &mut MetricSnapshot,
    partitions: &[PartitionReading],
) -> Vec<Command> {
    let mut commands = Vec::new();
    for partition in partitions {
        let Ok(usage) = &partition.usage else {
            continue;
        };
        if snapshot.disks.contains_key(&partition.mountpoint) {
            continue;
        }
        snapshot.disks.insert(
            partition.mountpoint.clone(),
            DiskEntry::new(partition.mountpoint.as_str(), *usage),
        );
        commands.push(Command::InitDisk {
            mountpoint: partition.mountpoint.clone(),
        });
    }
    commands
}
