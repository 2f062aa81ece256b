use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Subset of the Open-Meteo forecast payload we read.
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub daily: DailySeries,
}

#[derive(Debug, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    pub date: String,
    pub t_min: Option<f64>,
    pub t_max: Option<f64>,
    pub rain_prob: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityForecast {
    pub city: String,
    pub today: DayForecast,
    pub days: Vec<DayForecast>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub success: bool,
    pub data: Vec<CityForecast>,
}

impl DailySeries {
    pub fn days(&self) -> Vec<DayForecast> {
        self.time
            .iter()
            .enumerate()
            .map(|(idx, date)| DayForecast {
                date: date.clone(),
                t_min: self.temperature_2m_min.get(idx).copied().flatten(),
                t_max: self.temperature_2m_max.get(idx).copied().flatten(),
                rain_prob: self.precipitation_probability_max.get(idx).copied().flatten(),
            })
            .collect()
    }
}

impl ForecastPayload {
    pub fn into_city_forecast(self, city: &str) -> Result<CityForecast, AppError> {
        let days = self.daily.days();
        let today = days
            .first()
            .cloned()
            .ok_or_else(|| AppError::Upstream(format!("empty forecast for {}", city)))?;
        Ok(CityForecast {
            city: city.to_string(),
            today,
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_series_zips_columns() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"daily": {
                "time": ["2025-06-01", "2025-06-02"],
                "temperature_2m_max": [31.2, 29.0],
                "temperature_2m_min": [18.4, null],
                "precipitation_probability_max": [5, 40]
            }}"#,
        )
        .unwrap();

        let forecast = payload.into_city_forecast("Fes").unwrap();
        assert_eq!(forecast.today.date, "2025-06-01");
        assert_eq!(forecast.today.t_max, Some(31.2));
        assert_eq!(forecast.days[1].t_min, None);
        assert_eq!(forecast.days[1].rain_prob, Some(40.0));
    }

    #[test]
    fn test_empty_series_is_an_upstream_error() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"daily": {"time": [], "temperature_2m_max": [],
                "temperature_2m_min": [], "precipitation_probability_max": []}}"#,
        )
        .unwrap();
        assert!(matches!(
            payload.into_city_forecast("Taza"),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn test_day_forecast_wire_names() {
        let day = DayForecast {
            date: "2025-06-01".into(),
            t_min: Some(1.0),
            t_max: Some(2.0),
            rain_prob: None,
        };
        let json = serde_json::to_value(&day).unwrap();
        assert!(json.get("tMin").is_some());
        assert!(json.get("rainProb").is_some());
    }
}
