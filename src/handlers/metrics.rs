//! Host metrics snapshot endpoint.
//! Used by: server.

use axum::extract::State;
use axum::Json;

use crate::snapshot::MetricsSnapshot;
use crate::state::AppState;

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.snapshots.read())
}
