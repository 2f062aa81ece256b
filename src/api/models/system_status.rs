use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InverterStatus {
    On,
    Off,
    Standby,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusInput {
    pub solar_power: f64,
    pub battery_level: f64,
    pub load_power: f64,
    pub grid_status: GridStatus,
    pub inverter_status: InverterStatus,
}

/// Installation-level snapshot reported by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusRecord {
    pub timestamp: DateTime<Utc>,
    pub solar_power: f64,
    pub battery_level: f64,
    pub load_power: f64,
    pub grid_status: GridStatus,
    pub inverter_status: InverterStatus,
}

impl SystemStatusInput {
    pub fn into_record(self, timestamp: DateTime<Utc>) -> SystemStatusRecord {
        SystemStatusRecord {
            timestamp,
            solar_power: self.solar_power,
            battery_level: self.battery_level,
            load_power: self.load_power,
            grid_status: self.grid_status,
            inverter_status: self.inverter_status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatusCreated {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    pub success: bool,
    pub data: Option<SystemStatusRecord>,
}
