// The poller against a live in-process sensor-data endpoint.

mod common;

use common::{spawn_server, test_config};
use pretty_assertions::assert_eq;
use serde_json::json;
use solar_monitor::api::{create_router, AppState};
use solar_monitor::config::PollerConfig;
use solar_monitor::poller::SensorPoller;
use solar_monitor::sensors::{Channel, ConnectionStatus, SystemSensorsState};

fn poller_config(base: &str) -> PollerConfig {
    PollerConfig {
        url: format!("{}/api/v1/sensor-data", base),
        interval_ms: 200,
        limit: 20,
        timeout_ms: 2000,
        stale_after_missed_polls: None,
    }
}

async fn upstream() -> String {
    let state = AppState::from_config(&test_config(50), None).unwrap();
    spawn_server(create_router(state)).await
}

#[tokio::test]
async fn test_poll_merges_latest_reading_and_keeps_other_channels() {
    let base = upstream().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/v1/sensor-data", base))
        .json(&json!({ "batteryTemperature": 35.5, "humidity": 40.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let sensors = SystemSensorsState::shared();
    sensors.write().await.update(Channel::Battery, 76.0);
    let battery_before = sensors.read().await.battery.clone();

    let poller = SensorPoller::new(&poller_config(&base), sensors.clone()).unwrap();
    let changed = poller.poll_once().await.unwrap();
    assert_eq!(changed, vec![Channel::Temperature, Channel::Humidity]);

    let state = sensors.read().await;
    assert_eq!(state.temperature.value(), Some(&35.5));
    assert_eq!(state.humidity.value(), Some(&40.0));
    assert_eq!(state.battery, battery_before);
    assert!(!state.solar_voltage.is_connected());
}

#[tokio::test]
async fn test_poll_of_empty_endpoint_disconnects_fed_channels() {
    let base = upstream().await;

    let sensors = SystemSensorsState::shared();
    sensors.write().await.update(Channel::Temperature, 22.0);

    let poller = SensorPoller::new(&poller_config(&base), sensors.clone()).unwrap();
    poller.poll_once().await.unwrap();

    let state = sensors.read().await;
    assert_eq!(state.temperature.status(), ConnectionStatus::Disconnected);
    assert!(state.temperature.value().is_none());
}

#[tokio::test]
async fn test_poll_error_status_keeps_previous_state() {
    let router = axum::Router::new().route(
        "/api/v1/sensor-data",
        axum::routing::get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_server(router).await;

    let sensors = SystemSensorsState::shared();
    sensors.write().await.update(Channel::Humidity, 61.0);

    let poller = SensorPoller::new(&poller_config(&base), sensors.clone()).unwrap();
    let err = poller.poll_once().await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert_eq!(sensors.read().await.humidity.value(), Some(&61.0));
}

#[tokio::test]
async fn test_run_loop_feeds_the_aggregate() {
    let base = upstream().await;
    reqwest::Client::new()
        .post(format!("{}/api/v1/sensor-data", base))
        .json(&json!({ "temperature": 18.0 }))
        .send()
        .await
        .unwrap();

    let sensors = SystemSensorsState::shared();
    let poller = SensorPoller::new(&poller_config(&base), sensors.clone()).unwrap();
    let handle = tokio::spawn(poller.run());

    let mut merged = false;
    for _ in 0..50 {
        if sensors.read().await.temperature.is_connected() {
            merged = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    handle.abort();

    assert!(merged);
    assert_eq!(sensors.read().await.temperature.value(), Some(&18.0));
}

#[tokio::test]
async fn test_watchdog_disconnects_channel_when_upstream_goes_silent() {
    use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    async fn readings(State(up): State<Arc<AtomicBool>>) -> axum::response::Response {
        if !up.load(Ordering::SeqCst) {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        let reading = json!({ "timestamp": chrono::Utc::now().to_rfc3339(), "temperature": 20.0 });
        Json(json!({ "current": reading.clone(), "readings": [reading] })).into_response()
    }

    let up = Arc::new(AtomicBool::new(true));
    let router = axum::Router::new()
        .route("/api/v1/sensor-data", get(readings))
        .with_state(up.clone());
    let base = spawn_server(router).await;

    let mut cfg = poller_config(&base);
    cfg.interval_ms = 100;
    cfg.stale_after_missed_polls = Some(1);

    let sensors = SystemSensorsState::shared();
    let handle = tokio::spawn(SensorPoller::new(&cfg, sensors.clone()).unwrap().run());

    let mut connected = false;
    for _ in 0..50 {
        if sensors.read().await.temperature.is_connected() {
            connected = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(connected);

    up.store(false, Ordering::SeqCst);

    let mut expired = false;
    for _ in 0..100 {
        {
            let state = sensors.read().await;
            if state.temperature.status() == ConnectionStatus::Disconnected {
                assert_eq!(state.temperature.error_message(), Some("No update received"));
                assert!(state.temperature.value().is_none());
                expired = true;
            }
        }
        if expired {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    handle.abort();

    assert!(expired);
}
