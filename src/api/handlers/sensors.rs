use axum::{extract::State, Json};

use super::AppState;
use crate::api::models::SensorStateResponse;

/// GET /api/v1/sensors/state
/// Snapshot of the aggregate the poller maintains
pub async fn get_state(State(state): State<AppState>) -> Json<SensorStateResponse> {
    let snapshot = state.sensors.read().await.clone();
    Json(SensorStateResponse::from_state(snapshot))
}
