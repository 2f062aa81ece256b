use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;

use super::{json_body, AppState};
use crate::{
    api::models::{SystemStatusCreated, SystemStatusInput, SystemStatusResponse},
    error::Result,
};

/// POST /api/v1/system-status
pub async fn record_status(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SystemStatusInput>, JsonRejection>,
) -> Result<Json<SystemStatusCreated>> {
    let record = json_body(payload)?.into_record(Utc::now());
    let id = state.system_status.record(&record).await?;
    Ok(Json(SystemStatusCreated { success: true, id }))
}

/// GET /api/v1/system-status
/// Latest snapshot, or null when none was recorded
pub async fn latest_status(State(state): State<AppState>) -> Result<Json<SystemStatusResponse>> {
    let data = state.system_status.latest().await?;
    Ok(Json(SystemStatusResponse {
        success: true,
        data,
    }))
}
