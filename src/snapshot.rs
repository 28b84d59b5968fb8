//! Latest host readings shared between the collector and the HTTP handlers.
//! Used by: collector, handlers::metrics, state.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Point-in-time copy of the store. Serializes to the `/metrics` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    #[serde(serialize_with = "rfc3339_seconds")]
    pub last_updated_utc: DateTime<Utc>,
    #[serde(rename = "kubernetes_pod_name")]
    pub pod_identity: String,
}

fn rfc3339_seconds<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[derive(Debug, Clone, Copy)]
struct Reading {
    cpu: f64,
    memory: f64,
    at: DateTime<Utc>,
}

/// Many readers, one periodic writer. The lock is only held to copy three
/// scalars, never while sampling.
pub struct SnapshotStore {
    pod_identity: String,
    current: RwLock<Reading>,
}

impl SnapshotStore {
    pub fn new(pod_identity: impl Into<String>) -> Self {
        Self {
            pod_identity: pod_identity.into(),
            current: RwLock::new(Reading { cpu: 0.0, memory: 0.0, at: Utc::now() }),
        }
    }

    pub fn write(&self, cpu: f64, memory: f64, at: DateTime<Utc>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Reading { cpu, memory, at };
    }

    pub fn read(&self) -> MetricsSnapshot {
        let reading = *self.current.read().unwrap_or_else(PoisonError::into_inner);
        MetricsSnapshot {
            cpu_usage_percent: reading.cpu,
            memory_usage_percent: reading.memory,
            last_updated_utc: reading.at,
            pod_identity: self.pod_identity.clone(),
        }
    }

    pub fn pod_identity(&self) -> &str {
        &self.pod_identity
    }
}
