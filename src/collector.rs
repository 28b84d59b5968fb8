//! Periodic host sampling into the shared snapshot store.
//! Used by: main.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use sysinfo::System;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{Error, Result};
use crate::snapshot::SnapshotStore;

pub const COLLECT_INTERVAL: Duration = Duration::from_secs(15);
pub const CPU_WINDOW: Duration = Duration::from_secs(1);

/// Source of host utilization readings. Calls may block for up to `window`.
pub trait HostSampler: Send + 'static {
    fn sample_cpu_percent(&mut self, window: Duration) -> Result<f64>;
    fn sample_memory_percent(&mut self) -> Result<f64>;
}

pub struct SysinfoSampler {
    system: System,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self { system: System::new() }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSampler for SysinfoSampler {
    fn sample_cpu_percent(&mut self, window: Duration) -> Result<f64> {
        // Usage is the delta between two refreshes.
        self.system.refresh_cpu();
        std::thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu();

        if self.system.cpus().is_empty() {
            return Err(Error::Sampling("no cpu information available".into()));
        }
        finite(f64::from(self.system.global_cpu_info().cpu_usage()), "cpu")
    }

    fn sample_memory_percent(&mut self) -> Result<f64> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(Error::Sampling("total memory reported as zero".into()));
        }
        let used = self.system.used_memory();
        finite(used as f64 / total as f64 * 100.0, "memory")
    }
}

fn finite(value: f64, metric: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Sampling(format!("{metric} reading is not a number")))
    }
}

/// Owns the write side of the store.
pub struct Collector<S> {
    sampler: S,
    store: Arc<SnapshotStore>,
}

impl<S: HostSampler> Collector<S> {
    pub fn new(sampler: S, store: Arc<SnapshotStore>) -> Self {
        Self { sampler, store }
    }

    /// One collection cycle. A failed sample keeps the previous value for
    /// that metric; the timestamp always advances.
    pub fn collect_once(&mut self) {
        let previous = self.store.read();

        let cpu = self.sampler.sample_cpu_percent(CPU_WINDOW).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cpu sample failed, keeping previous value");
            previous.cpu_usage_percent
        });
        let memory = self.sampler.sample_memory_percent().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "memory sample failed, keeping previous value");
            previous.memory_usage_percent
        });

        let at = Utc::now();
        self.store.write(cpu, memory, at);

        tracing::info!(
            cpu_usage_percent = cpu,
            memory_usage_percent = memory,
            last_updated_utc = %at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "metrics collected: cpu {cpu:.2}%, memory {memory:.2}%"
        );
    }

    async fn collect_blocking(mut self) -> Option<Self> {
        let joined = tokio::task::spawn_blocking(move || {
            self.collect_once();
            self
        })
        .await;

        match joined {
            Ok(collector) => Some(collector),
            Err(e) => {
                tracing::error!(error = %e, "collection cycle panicked, collector stopped");
                None
            }
        }
    }

    /// Runs the first cycle before returning, then keeps collecting on
    /// `interval` in a background task for the life of the process.
    pub async fn start(self, interval: Duration) -> JoinHandle<()> {
        tracing::info!("performing initial metrics collection");
        let first = self.collect_blocking().await;

        tokio::spawn(async move {
            let Some(mut collector) = first else { return };
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                collector = match collector.collect_blocking().await {
                    Some(c) => c,
                    None => return,
                };
            }
        })
    }
}
