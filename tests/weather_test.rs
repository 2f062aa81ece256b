// Weather proxy against a fake forecast upstream.

mod common;

use axum::{http::StatusCode, routing::get, Json, Router};
use axum_test::TestServer;
use common::{spawn_server, test_config};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use solar_monitor::api::{create_router, AppState};
use solar_monitor::config::City;

fn forecast_body() -> Value {
    json!({
        "daily": {
            "time": ["2026-10-16", "2026-10-17"],
            "temperature_2m_max": [27.4, 25.1],
            "temperature_2m_min": [14.2, null],
            "precipitation_probability_max": [10, 65]
        }
    })
}

async fn server_with_upstream(upstream: Router) -> TestServer {
    let base = spawn_server(upstream).await;
    let mut cfg = test_config(10);
    cfg.weather.base_url = format!("{}/v1/forecast", base);
    cfg.weather.cities = vec![City {
        name: "Fes".into(),
        latitude: 34.0331,
        longitude: -5.0003,
    }];
    let state = AppState::from_config(&cfg, None).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_weather_returns_city_forecasts() {
    let upstream = Router::new().route("/v1/forecast", get(|| async { Json(forecast_body()) }));
    let server = server_with_upstream(upstream).await;

    let response = server.get("/api/v1/weather").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"][0]["city"], json!("Fes"));
    assert_eq!(body["data"][0]["today"]["date"], json!("2026-10-16"));
    assert_eq!(body["data"][0]["today"]["tMax"], json!(27.4));
    assert_eq!(body["data"][0]["days"][1]["tMin"], Value::Null);
    assert_eq!(body["data"][0]["days"][1]["rainProb"], json!(65.0));
}

#[tokio::test]
async fn test_weather_upstream_failure_is_500() {
    let upstream = Router::new().route(
        "/v1/forecast",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let server = server_with_upstream(upstream).await;

    let response = server.get("/api/v1/weather").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Weather API error: 503"));
}
