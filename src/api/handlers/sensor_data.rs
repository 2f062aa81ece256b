use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::{json_body, query_params, AppState};
use crate::{
    api::models::{SensorDataCreated, SensorDataQuery, SensorDataResponse, SensorReadingInput},
    error::Result,
};

/// POST /api/v1/sensor-data
/// Accepts one reading from the field device
pub async fn create_reading(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SensorReadingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SensorDataCreated>)> {
    let reading = json_body(payload)?.validate(Utc::now())?;
    let outcome = state.sensor_data.append(reading).await;

    info!(
        memory_count = outcome.memory_count,
        file = outcome.storage.file,
        database = outcome.storage.database,
        "sensor reading stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(SensorDataCreated {
            success: true,
            message: "Sensor data received".to_string(),
            data: outcome.reading,
            storage: outcome.storage,
            memory_count: outcome.memory_count,
        }),
    ))
}

/// GET /api/v1/sensor-data?type=all|battery&limit=N&deviceId=X
/// Newest readings first
pub async fn list_readings(
    State(state): State<AppState>,
    params: std::result::Result<Query<SensorDataQuery>, QueryRejection>,
) -> Result<Json<SensorDataResponse>> {
    let params = query_params(params)?;
    let filter = params.filter()?;
    let recent = state.sensor_data.recent(&filter, params.limit()).await;

    Ok(Json(SensorDataResponse {
        count: recent.readings.len(),
        current: recent.current,
        readings: recent.readings,
        source: recent.source,
        timestamp: Utc::now(),
    }))
}
