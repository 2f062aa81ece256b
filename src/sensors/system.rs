use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::connection::SensorConnection;

pub type SharedSensors = Arc<RwLock<SystemSensorsState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Battery,
    SolarVoltage,
    SolarCurrent,
    GridVoltage,
    GridFrequency,
    Temperature,
    Humidity,
    Production,
    Consumption,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::Battery,
        Channel::SolarVoltage,
        Channel::SolarCurrent,
        Channel::GridVoltage,
        Channel::GridFrequency,
        Channel::Temperature,
        Channel::Humidity,
        Channel::Production,
        Channel::Consumption,
    ];

    /// Field name in the serialized aggregate
    pub fn key(self) -> &'static str {
        match self {
            Channel::Battery => "battery",
            Channel::SolarVoltage => "solarVoltage",
            Channel::SolarCurrent => "solarCurrent",
            Channel::GridVoltage => "gridVoltage",
            Channel::GridFrequency => "gridFrequency",
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Production => "production",
            Channel::Consumption => "consumption",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Battery => "Battery",
            Channel::SolarVoltage => "Solar Voltage",
            Channel::SolarCurrent => "Solar Current",
            Channel::GridVoltage => "Grid Voltage",
            Channel::GridFrequency => "Grid Frequency",
            Channel::Temperature => "Temperature",
            Channel::Humidity => "Humidity",
            Channel::Production => "Production",
            Channel::Consumption => "Consumption",
        }
    }

    pub fn not_detected_message(self) -> &'static str {
        match self {
            Channel::Battery => "Batterie non détectée",
            Channel::SolarVoltage => "Capteur tension solaire non détecté",
            Channel::SolarCurrent => "Capteur courant solaire non détecté",
            Channel::GridVoltage => "Capteur tension réseau non détecté",
            Channel::GridFrequency => "Capteur fréquence réseau non détecté",
            Channel::Temperature => "Capteur température non détecté",
            Channel::Humidity => "Capteur humidité non détecté",
            Channel::Production => "Compteur production non détecté",
            Channel::Consumption => "Compteur consommation non détecté",
        }
    }

    fn not_detected(self) -> SensorConnection<f64> {
        SensorConnection::disconnected(self.name(), Some(self.not_detected_message()))
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Every channel of the installation. Channels are replaced, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSensorsState {
    pub battery: SensorConnection<f64>,
    pub solar_voltage: SensorConnection<f64>,
    pub solar_current: SensorConnection<f64>,
    pub grid_voltage: SensorConnection<f64>,
    pub grid_frequency: SensorConnection<f64>,
    pub temperature: SensorConnection<f64>,
    pub humidity: SensorConnection<f64>,
    pub production: SensorConnection<f64>,
    pub consumption: SensorConnection<f64>,
}

impl Default for SystemSensorsState {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSensorsState {
    /// All channels disconnected.
    pub fn new() -> Self {
        Self {
            battery: Channel::Battery.not_detected(),
            solar_voltage: Channel::SolarVoltage.not_detected(),
            solar_current: Channel::SolarCurrent.not_detected(),
            grid_voltage: Channel::GridVoltage.not_detected(),
            grid_frequency: Channel::GridFrequency.not_detected(),
            temperature: Channel::Temperature.not_detected(),
            humidity: Channel::Humidity.not_detected(),
            production: Channel::Production.not_detected(),
            consumption: Channel::Consumption.not_detected(),
        }
    }

    pub fn shared() -> SharedSensors {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn get(&self, channel: Channel) -> &SensorConnection<f64> {
        match channel {
            Channel::Battery => &self.battery,
            Channel::SolarVoltage => &self.solar_voltage,
            Channel::SolarCurrent => &self.solar_current,
            Channel::GridVoltage => &self.grid_voltage,
            Channel::GridFrequency => &self.grid_frequency,
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::Production => &self.production,
            Channel::Consumption => &self.consumption,
        }
    }

    pub fn replace(&mut self, channel: Channel, conn: SensorConnection<f64>) {
        let slot = match channel {
            Channel::Battery => &mut self.battery,
            Channel::SolarVoltage => &mut self.solar_voltage,
            Channel::SolarCurrent => &mut self.solar_current,
            Channel::GridVoltage => &mut self.grid_voltage,
            Channel::GridFrequency => &mut self.grid_frequency,
            Channel::Temperature => &mut self.temperature,
            Channel::Humidity => &mut self.humidity,
            Channel::Production => &mut self.production,
            Channel::Consumption => &mut self.consumption,
        };
        *slot = conn;
    }

    pub fn update(&mut self, channel: Channel, value: f64) {
        self.replace(channel, SensorConnection::connected(value));
    }

    pub fn disconnect(&mut self, channel: Channel) {
        self.replace(channel, SensorConnection::disconnected(channel.name(), None));
    }

    pub fn set_error(&mut self, channel: Channel, error: impl Into<String>) {
        self.replace(channel, SensorConnection::error(error));
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Disconnect every connected channel whose last update is older than `max_age`.
    pub fn expire_stale(&mut self, now: DateTime<Utc>, max_age: Duration) -> Vec<Channel> {
        let stale: Vec<Channel> = Channel::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_stale(now, max_age))
            .collect();
        for channel in &stale {
            self.replace(
                *channel,
                SensorConnection::disconnected(channel.name(), Some("No update received")),
            );
        }
        stale
    }

    pub fn connected_count(&self) -> usize {
        Channel::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_connected())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::ConnectionStatus;

    #[test]
    fn test_default_state_all_disconnected() {
        let state = SystemSensorsState::new();
        for channel in Channel::ALL {
            let conn = state.get(channel);
            assert_eq!(conn.status(), ConnectionStatus::Disconnected);
            assert_eq!(conn.error_message(), Some(channel.not_detected_message()));
        }
        assert_eq!(state.connected_count(), 0);
    }

    #[test]
    fn test_update_touches_only_its_channel() {
        let mut state = SystemSensorsState::new();
        state.update(Channel::Battery, 85.0);

        assert_eq!(state.battery.value(), Some(&85.0));
        for channel in Channel::ALL.into_iter().filter(|c| *c != Channel::Battery) {
            assert!(!state.get(channel).is_connected(), "{}", channel);
        }
    }

    #[test]
    fn test_disconnect_and_error() {
        let mut state = SystemSensorsState::new();
        state.update(Channel::Temperature, 24.5);
        state.disconnect(Channel::Temperature);
        assert!(state.temperature.value().is_none());
        assert_eq!(state.temperature.error_message(), Some("Temperature not detected"));

        state.set_error(Channel::Humidity, "checksum mismatch");
        assert_eq!(state.humidity.status(), ConnectionStatus::Error);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = SystemSensorsState::new();
        state.update(Channel::GridVoltage, 230.0);
        state.reset();
        assert_eq!(state, SystemSensorsState::new());
    }

    #[test]
    fn test_expire_stale_only_hits_old_channels() {
        let mut state = SystemSensorsState::new();
        state.update(Channel::Battery, 80.0);
        state.update(Channel::Temperature, 21.0);
        let later = state.battery.last_update().unwrap() + Duration::seconds(30);

        let expired = state.expire_stale(later, Duration::seconds(60));
        assert!(expired.is_empty());

        let much_later = later + Duration::seconds(60);
        let expired = state.expire_stale(much_later, Duration::seconds(60));
        assert_eq!(expired, vec![Channel::Battery, Channel::Temperature]);
        assert_eq!(state.connected_count(), 0);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(SystemSensorsState::new()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 9);
        for channel in Channel::ALL {
            assert!(obj.contains_key(channel.key()), "{}", channel.key());
        }
    }
}
