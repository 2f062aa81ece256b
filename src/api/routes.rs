use crate::api::handlers::{
    feedback, health, logs, sensor_data, sensors, system_status, temperature_logs, weather,
    AppState,
};
use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::Level;

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health::health));

    let api_routes = Router::new()
        .route(
            "/api/v1/sensor-data",
            get(sensor_data::list_readings).post(sensor_data::create_reading),
        )
        .route(
            "/api/v1/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route(
            "/api/v1/logs",
            get(logs::list_logins).post(logs::record_login),
        )
        .route("/api/v1/weather", get(weather::get_forecasts))
        .route("/api/v1/sensors/state", get(sensors::get_state))
        .route(
            "/api/v1/system-status",
            get(system_status::latest_status).post(system_status::record_status),
        )
        .route(
            "/api/v1/temperature-logs",
            get(temperature_logs::list_temperature_logs)
                .post(temperature_logs::record_temperature_log),
        );

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::INFO,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                )
                .on_failure(
                    |_error: tower_http::classify::ServerErrorsFailureClass,
                     _latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::ERROR, "request failed");
                    },
                ),
        )
}
