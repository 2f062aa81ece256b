pub mod feedback;
pub mod health;
pub mod logs;
pub mod sensor_data;
pub mod sensors;
pub mod system_status;
pub mod temperature_logs;
pub mod weather;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::repositories::{
    feedback::FEEDBACK_FILE_NAME, login_logs::LOGIN_LOG_FILE_NAME,
    sensor_data::SENSOR_FILE_NAME, FeedbackRepository, LoginLogRepository, SensorDataRepository,
    SystemStatusRepository, TemperatureLogRepository,
};
use crate::sensors::{SharedSensors, SystemSensorsState};
use crate::services::WeatherService;
use crate::storage::JsonFileStore;

#[derive(Clone)]
pub struct AppState {
    pub sensor_data: Arc<SensorDataRepository>,
    pub feedback: Arc<FeedbackRepository>,
    pub login_logs: Arc<LoginLogRepository>,
    pub system_status: Arc<SystemStatusRepository>,
    pub temperature_logs: Arc<TemperatureLogRepository>,
    pub weather: WeatherService,
    pub sensors: SharedSensors,
}

impl AppState {
    pub fn from_config(cfg: &Config, pool: Option<DbPool>) -> Result<Self> {
        Self::with_sensors(cfg, pool, SystemSensorsState::shared())
    }

    /// Same as `from_config` but reads the aggregate a poller is already feeding.
    pub fn with_sensors(cfg: &Config, pool: Option<DbPool>, sensors: SharedSensors) -> Result<Self> {
        let storage = &cfg.storage;
        let store = |name: &str| {
            JsonFileStore::new(
                storage.data_dir.join(name),
                storage.seed_dir.as_ref().map(|dir| dir.join(name)),
            )
        };

        let sensor_file = storage.sensor_file.then(|| store(SENSOR_FILE_NAME));
        Ok(Self {
            sensor_data: Arc::new(SensorDataRepository::new(
                storage.memory_capacity,
                sensor_file,
                pool.clone(),
            )),
            feedback: Arc::new(FeedbackRepository::new(
                store(FEEDBACK_FILE_NAME),
                pool.clone(),
                storage.feedback_capacity,
            )),
            login_logs: Arc::new(LoginLogRepository::new(
                store(LOGIN_LOG_FILE_NAME),
                pool.clone(),
                storage.login_log_capacity,
            )),
            system_status: Arc::new(SystemStatusRepository::new(pool.clone())),
            temperature_logs: Arc::new(TemperatureLogRepository::new(pool)),
            weather: WeatherService::new(&cfg.weather)?,
            sensors,
        })
    }
}

/// Unwraps a JSON body, turning malformed input into a 400.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// Unwraps query parameters, turning unparsable values into a 400.
pub(crate) fn query_params<T>(
    params: std::result::Result<Query<T>, QueryRejection>,
) -> Result<T> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}
