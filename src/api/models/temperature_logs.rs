use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::sensors::TemperatureStatus;

pub const DEFAULT_HOURS: i64 = 24;
pub const MAX_HOURS: i64 = 24 * 30;
pub const MAX_ENTRIES: usize = 1000;

/// Battery temperature sample kept in the `temperature_logs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureLogEntry {
    pub timestamp: DateTime<Utc>,
    pub battery_temp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_temp: Option<f64>,
    pub status: TemperatureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_ssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// Body of `POST /api/v1/temperature-logs`, sent by devices that log directly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureLogInput {
    pub battery_temp: Option<f64>,
    pub ambient_temp: Option<f64>,
    pub device_id: Option<String>,
    pub status: Option<String>,
    pub wifi_ssid: Option<String>,
}

impl TemperatureLogInput {
    /// `batteryTemp` and `deviceId` are required. A missing status is derived
    /// from the battery temperature; a given one must be a known band.
    pub fn validate(self, timestamp: DateTime<Utc>) -> Result<TemperatureLogEntry, AppError> {
        let battery_temp = self
            .battery_temp
            .filter(|t| t.is_finite())
            .ok_or_else(|| AppError::Validation("batteryTemp must be a number".to_string()))?;

        let device_id = self
            .device_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("deviceId is required".to_string()))?;

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => TemperatureStatus::classify(Some(battery_temp)),
            Some("cold") => TemperatureStatus::Cold,
            Some("normal") => TemperatureStatus::Normal,
            Some("warm") => TemperatureStatus::Warm,
            Some("critical") => TemperatureStatus::Critical,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "Unknown status '{}'. Supported: cold, normal, warm, critical",
                    other
                )))
            }
        };

        Ok(TemperatureLogEntry {
            timestamp,
            battery_temp,
            ambient_temp: self.ambient_temp,
            status,
            wifi_ssid: self.wifi_ssid.filter(|s| !s.trim().is_empty()),
            device_id: Some(device_id),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemperatureLogCreated {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemperatureLogQuery {
    pub hours: Option<i64>,
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
}

impl TemperatureLogQuery {
    /// Clamped to [1, MAX_HOURS].
    pub fn hours(&self) -> i64 {
        self.hours.unwrap_or(DEFAULT_HOURS).clamp(1, MAX_HOURS)
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemperatureLogResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<TemperatureLogEntry>,
}
