//! Shared application state.

use std::sync::Arc;

use crate::snapshot::SnapshotStore;

pub struct AppStateInner {
    pub snapshots: Arc<SnapshotStore>,
}

pub type AppState = Arc<AppStateInner>;

/// The store handle is shared with the collector, which owns the write side.
pub fn build_state(pod_name: &str) -> AppState {
    Arc::new(AppStateInner {
        snapshots: Arc::new(SnapshotStore::new(pod_name)),
    })
}
