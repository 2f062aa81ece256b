use axum::{extract::State, Json};

use super::AppState;
use crate::{api::models::WeatherResponse, error::Result};

/// GET /api/v1/weather
pub async fn get_forecasts(State(state): State<AppState>) -> Result<Json<WeatherResponse>> {
    let data = state.weather.forecasts().await?;
    Ok(Json(WeatherResponse {
        success: true,
        data,
    }))
}
