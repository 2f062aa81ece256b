use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
    Critical,
}

/// Entry of the `alerts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    pub source: String,
    pub resolved: bool,
}

impl Alert {
    pub fn battery_overheat(timestamp: DateTime<Utc>, celsius: f64) -> Self {
        Self {
            timestamp,
            level: AlertLevel::Critical,
            title: "Température batterie critique".to_string(),
            message: format!("Battery temperature reached {:.1}°C", celsius),
            source: "sensor-data".to_string(),
            resolved: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overheat_alert_document() {
        let alert = Alert::battery_overheat(Utc::now(), 61.25);
        let doc = serde_json::to_value(&alert).unwrap();
        assert_eq!(doc["type"], json!("critical"));
        assert_eq!(doc["resolved"], json!(false));
        assert_eq!(doc["message"], json!("Battery temperature reached 61.2°C"));
    }
}
