use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use chrono::Utc;
use tracing::warn;

use super::{json_body, AppState};
use crate::{
    api::models::{LogAck, LoginLogEntry, LoginLogInput},
    error::Result,
};

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// First hop of `X-Forwarded-For`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
}

pub async fn record_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<LoginLogInput>, JsonRejection>,
) -> Result<Json<LogAck>> {
    let entry = json_body(payload)?.into_entry(
        Utc::now(),
        header_value(&headers, USER_AGENT.as_str()),
        client_ip(&headers),
    );
    state.login_logs.append(entry).await?;
    Ok(Json(LogAck { ok: true }))
}

pub async fn list_logins(State(state): State<AppState>) -> Json<Vec<LoginLogEntry>> {
    match state.login_logs.list().await {
        Ok(entries) => Json(entries),
        Err(e) => {
            warn!(error = %e, "failed to read login logs");
            Json(Vec::new())
        }
    }
}
