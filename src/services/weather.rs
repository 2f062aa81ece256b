use crate::api::models::weather::{CityForecast, ForecastPayload};
use crate::config::{City, WeatherConfig};
use crate::error::{AppError, Result};
use futures::future::try_join_all;
use std::time::Duration;
use tracing::debug;

/// Daily forecasts for a fixed list of cities, proxied from Open-Meteo.
#[derive(Clone)]
pub struct WeatherService {
    client: reqwest::Client,
    base_url: String,
    forecast_days: u8,
    cities: Vec<City>,
}

impl WeatherService {
    pub fn new(cfg: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            forecast_days: cfg.forecast_days,
            cities: cfg.cities.clone(),
        })
    }

    /// All cities concurrently; the first failure fails the whole request.
    pub async fn forecasts(&self) -> Result<Vec<CityForecast>> {
        try_join_all(self.cities.iter().map(|city| self.city_forecast(city))).await
    }

    async fn city_forecast(&self, city: &City) -> Result<CityForecast> {
        debug!(city = %city.name, "fetching forecast");
        let days = self.forecast_days.to_string();
        let latitude = city.latitude.to_string();
        let longitude = city.longitude.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_probability_max",
                ),
                ("forecast_days", days.as_str()),
                ("timezone", "auto"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Weather API error: {}",
                status.as_u16()
            )));
        }

        let payload: ForecastPayload = response.json().await?;
        payload.into_city_forecast(&city.name)
    }
}
