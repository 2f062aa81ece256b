//! Polling fetch loop
//!
//! Periodically pulls the latest readings from a sensor-data endpoint and
//! merges them into the shared `SystemSensorsState`. A failed poll leaves the
//! aggregate untouched; the next tick simply tries again.

use crate::api::models::SensorReading;
use crate::config::PollerConfig;
use crate::error::{AppError, Result};
use crate::sensors::{Channel, SensorConnection, SharedSensors, SystemSensorsState};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What the poller reads from `GET /api/v1/sensor-data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub current: Option<SensorReading>,
    #[serde(default)]
    pub readings: Vec<SensorReading>,
}

impl Snapshot {
    pub fn newest(&self) -> Option<&SensorReading> {
        self.current.as_ref().or_else(|| self.readings.first())
    }
}

/// Channels this poller is responsible for.
pub const FED_CHANNELS: [Channel; 2] = [Channel::Temperature, Channel::Humidity];

/// Merge a snapshot into the aggregate and return the channels that changed.
///
/// Only channels backed by a field of the newest record are replaced. An
/// empty snapshot disconnects the channels this poller feeds.
pub fn merge_snapshot(state: &mut SystemSensorsState, snapshot: &Snapshot) -> Vec<Channel> {
    let Some(reading) = snapshot.newest() else {
        for channel in FED_CHANNELS {
            state.replace(
                channel,
                SensorConnection::disconnected(channel.name(), Some("No readings available")),
            );
        }
        return FED_CHANNELS.to_vec();
    };

    let mut touched = Vec::new();
    match reading.primary_temperature() {
        Some(t) => {
            state.update(Channel::Temperature, t);
            touched.push(Channel::Temperature);
        }
        None if reading.sensor_error => {
            state.set_error(Channel::Temperature, "Sensor reported a read error");
            touched.push(Channel::Temperature);
        }
        None => {}
    }
    if let Some(h) = reading.humidity {
        state.update(Channel::Humidity, h);
        touched.push(Channel::Humidity);
    }
    touched
}

pub struct SensorPoller {
    client: reqwest::Client,
    url: String,
    limit: usize,
    period: Duration,
    stale_after: Option<Duration>,
    sensors: SharedSensors,
}

impl SensorPoller {
    pub fn new(cfg: &PollerConfig, sensors: SharedSensors) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            client,
            url: cfg.url.clone(),
            limit: cfg.limit,
            period: cfg.interval(),
            stale_after: cfg.stale_after(),
            sensors,
        })
    }

    /// Runs until the task is aborted.
    pub async fn run(self) {
        info!(url = %self.url, interval_ms = self.period.as_millis() as u64, "sensor poller started");

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.poll_once().await {
                Ok(changed) => debug!(?changed, "poll merged"),
                Err(e) => warn!(url = %self.url, error = %e, "poll failed; keeping previous state"),
            }

            self.expire_stale().await;
        }
    }

    /// Fetch one snapshot and merge it. Errors leave the aggregate untouched.
    pub async fn poll_once(&self) -> Result<Vec<Channel>> {
        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("type", "all"), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "sensor endpoint returned {}",
                status.as_u16()
            )));
        }

        let snapshot: Snapshot = response.json().await?;
        let mut state = self.sensors.write().await;
        Ok(merge_snapshot(&mut state, &snapshot))
    }

    async fn expire_stale(&self) {
        let Some(max_age) = self.stale_after else {
            return;
        };
        let Ok(max_age) = chrono::Duration::from_std(max_age) else {
            return;
        };
        let expired = self.sensors.write().await.expire_stale(Utc::now(), max_age);
        if !expired.is_empty() {
            warn!(?expired, "channels went stale; marked disconnected");
        }
    }
}
