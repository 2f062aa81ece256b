use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sensors::{SystemSensorsState, TemperatureStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStateResponse {
    pub sensors: SystemSensorsState,
    pub connected_count: usize,
    pub temperature_status: TemperatureStatus,
    pub timestamp: DateTime<Utc>,
}

impl SensorStateResponse {
    pub fn from_state(sensors: SystemSensorsState) -> Self {
        let temperature_status =
            TemperatureStatus::classify(sensors.temperature.value().copied());
        Self {
            connected_count: sensors.connected_count(),
            temperature_status,
            sensors,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::Channel;

    #[test]
    fn test_status_follows_temperature_channel() {
        let mut state = SystemSensorsState::new();
        assert_eq!(
            SensorStateResponse::from_state(state.clone()).temperature_status,
            TemperatureStatus::Disconnected
        );

        state.update(Channel::Temperature, 45.0);
        let response = SensorStateResponse::from_state(state);
        assert_eq!(response.temperature_status, TemperatureStatus::Warm);
        assert_eq!(response.connected_count, 1);
    }
}
