use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Utc;

use super::{json_body, query_params, AppState};
use crate::{
    api::models::{
        TemperatureLogCreated, TemperatureLogInput, TemperatureLogQuery, TemperatureLogResponse,
    },
    error::Result,
};

/// POST /api/v1/temperature-logs
pub async fn record_temperature_log(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TemperatureLogInput>, JsonRejection>,
) -> Result<Json<TemperatureLogCreated>> {
    let entry = json_body(payload)?.validate(Utc::now())?;
    let id = state.temperature_logs.record(&entry).await?;
    Ok(Json(TemperatureLogCreated { success: true, id }))
}

/// GET /api/v1/temperature-logs?hours=N&deviceId=X
pub async fn list_temperature_logs(
    State(state): State<AppState>,
    params: std::result::Result<Query<TemperatureLogQuery>, QueryRejection>,
) -> Result<Json<TemperatureLogResponse>> {
    let params = query_params(params)?;
    let data = state
        .temperature_logs
        .since_hours(params.hours(), params.device_id())
        .await?;
    Ok(Json(TemperatureLogResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
