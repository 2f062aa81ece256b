//! Connection state of a single sensor channel.
//!
//! A `SensorConnection` only ever carries a value while it is connected; the
//! fields are private so every instance goes through one of the constructors.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
    Initializing,
}

impl ConnectionStatus {
    /// Localized label shown on the dashboard cards.
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connecté",
            ConnectionStatus::Disconnected => "Non connecté",
            ConnectionStatus::Error => "Erreur de lecture",
            ConnectionStatus::Initializing => "Initialisation...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConnection<T> {
    connected: bool,
    value: Option<T>,
    status: ConnectionStatus,
    status_message: String,
    last_update: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl<T> SensorConnection<T> {
    /// Sensor not detected. Without an explicit error the message names the sensor.
    pub fn disconnected(name: &str, error: Option<&str>) -> Self {
        let error = match error {
            Some(e) => e.to_string(),
            None => format!("{} not detected", name),
        };
        Self {
            connected: false,
            value: None,
            status: ConnectionStatus::Disconnected,
            status_message: ConnectionStatus::Disconnected.label().to_string(),
            last_update: None,
            error: Some(error),
        }
    }

    /// Real reading from hardware, stamped with the current time.
    pub fn connected(value: T) -> Self {
        Self {
            connected: true,
            value: Some(value),
            status: ConnectionStatus::Connected,
            status_message: ConnectionStatus::Connected.label().to_string(),
            last_update: Some(Utc::now()),
            error: None,
        }
    }

    /// Hardware answered but the read failed.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            connected: false,
            value: None,
            status: ConnectionStatus::Error,
            status_message: ConnectionStatus::Error.label().to_string(),
            last_update: None,
            error: Some(error.into()),
        }
    }

    pub fn initializing() -> Self {
        Self {
            connected: false,
            value: None,
            status: ConnectionStatus::Initializing,
            status_message: ConnectionStatus::Initializing.label().to_string(),
            last_update: None,
            error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_real_data(&self) -> bool {
        self.connected && self.value.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        if self.has_real_data() {
            self.value.as_ref()
        } else {
            None
        }
    }

    /// Empty when the value itself should be displayed.
    pub fn display_message(&self) -> &'static str {
        if self.has_real_data() {
            return "";
        }
        match self.status {
            ConnectionStatus::Connected => "Aucune donnée",
            other => other.label(),
        }
    }

    /// Connected but not refreshed within `max_age`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match (self.connected, self.last_update) {
            (true, Some(ts)) => now - ts > max_age,
            _ => false,
        }
    }
}
