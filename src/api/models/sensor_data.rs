use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 500;

/// Body of `POST /api/v1/sensor-data` as sent by the ESP32 boards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingInput {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub battery_temperature: Option<f64>,
    pub wifi_ssid: Option<String>,
    pub sensor_error: Option<bool>,
    pub device_id: Option<String>,
}

/// A validated, timestamped reading. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_ssid: Option<String>,
    #[serde(default)]
    pub sensor_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl SensorReadingInput {
    /// At least one scalar, or an explicit sensor error flag.
    pub fn validate(self, timestamp: DateTime<Utc>) -> Result<SensorReading, AppError> {
        let sensor_error = self.sensor_error.unwrap_or(false);
        let has_scalar = self.temperature.is_some()
            || self.humidity.is_some()
            || self.battery_temperature.is_some();

        if !has_scalar && !sensor_error {
            return Err(AppError::Validation(
                "At least one of temperature, humidity or batteryTemperature is required"
                    .to_string(),
            ));
        }

        Ok(SensorReading {
            timestamp,
            temperature: self.temperature,
            humidity: self.humidity,
            battery_temperature: self.battery_temperature,
            wifi_ssid: self.wifi_ssid.filter(|s| !s.trim().is_empty()),
            sensor_error,
            device_id: self
                .device_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        })
    }
}

impl SensorReading {
    /// Battery probe first, ambient probe as fallback.
    pub fn primary_temperature(&self) -> Option<f64> {
        self.battery_temperature.or(self.temperature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    #[default]
    All,
    Battery,
}

impl ReadingKind {
    pub fn matches(self, reading: &SensorReading) -> bool {
        match self {
            ReadingKind::All => true,
            ReadingKind::Battery => reading.battery_temperature.is_some(),
        }
    }
}

/// Which stored readings a query wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub kind: ReadingKind,
    pub device_id: Option<String>,
}

impl ReadingFilter {
    pub fn matches(&self, reading: &SensorReading) -> bool {
        self.kind.matches(reading)
            && match &self.device_id {
                Some(id) => reading.device_id.as_deref() == Some(id.as_str()),
                None => true,
            }
    }
}

impl From<ReadingKind> for ReadingFilter {
    fn from(kind: ReadingKind) -> Self {
        Self {
            kind,
            device_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorDataQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<i64>,
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
}

impl SensorDataQuery {
    pub fn kind(&self) -> Result<ReadingKind, AppError> {
        match self.kind.as_deref() {
            None | Some("") | Some("all") => Ok(ReadingKind::All),
            Some("battery") => Ok(ReadingKind::Battery),
            Some(other) => Err(AppError::Validation(format!(
                "Unknown reading type '{}'. Supported: all, battery",
                other
            ))),
        }
    }

    pub fn filter(&self) -> Result<ReadingFilter, AppError> {
        Ok(ReadingFilter {
            kind: self.kind()?,
            device_id: self
                .device_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        })
    }

    /// Clamped to [1, MAX_LIMIT].
    pub fn limit(&self) -> usize {
        match self.limit {
            None => DEFAULT_LIMIT,
            Some(n) if n < 1 => 1,
            Some(n) => (n as usize).min(MAX_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSource {
    Memory,
    File,
    Database,
    Empty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StorageReport {
    pub memory: bool,
    pub file: bool,
    pub database: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDataCreated {
    pub success: bool,
    pub message: String,
    pub data: SensorReading,
    pub storage: StorageReport,
    pub memory_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SensorDataResponse {
    pub current: Option<SensorReading>,
    pub readings: Vec<SensorReading>,
    pub count: usize,
    pub source: ReadingSource,
    pub timestamp: DateTime<Utc>,
}
