use serde::{Deserialize, Serialize};

const COLD_BELOW: f64 = 20.0;
const NORMAL_BELOW: f64 = 40.0;
const WARM_BELOW: f64 = 60.0;

/// Battery temperature band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureStatus {
    Disconnected,
    Cold,
    Normal,
    Warm,
    Critical,
}

impl TemperatureStatus {
    pub fn classify(celsius: Option<f64>) -> Self {
        match celsius {
            None => TemperatureStatus::Disconnected,
            Some(t) if t < COLD_BELOW => TemperatureStatus::Cold,
            Some(t) if t < NORMAL_BELOW => TemperatureStatus::Normal,
            Some(t) if t < WARM_BELOW => TemperatureStatus::Warm,
            Some(_) => TemperatureStatus::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureStatus::Disconnected => "Déconnecté",
            TemperatureStatus::Cold => "Froid",
            TemperatureStatus::Normal => "Normal",
            TemperatureStatus::Warm => "Chaud",
            TemperatureStatus::Critical => "Critique",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(TemperatureStatus::classify(None), TemperatureStatus::Disconnected);
        assert_eq!(TemperatureStatus::classify(Some(-5.0)), TemperatureStatus::Cold);
        assert_eq!(TemperatureStatus::classify(Some(19.9)), TemperatureStatus::Cold);
        assert_eq!(TemperatureStatus::classify(Some(20.0)), TemperatureStatus::Normal);
        assert_eq!(TemperatureStatus::classify(Some(35.5)), TemperatureStatus::Normal);
        assert_eq!(TemperatureStatus::classify(Some(40.0)), TemperatureStatus::Warm);
        assert_eq!(TemperatureStatus::classify(Some(60.0)), TemperatureStatus::Critical);
    }

    #[test]
    fn test_zero_is_a_reading() {
        assert_eq!(TemperatureStatus::classify(Some(0.0)), TemperatureStatus::Cold);
    }
}
