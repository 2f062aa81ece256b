use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use tracing::warn;

use super::{json_body, AppState};
use crate::{
    api::models::{feedback::THANK_YOU, FeedbackAck, FeedbackEntry, FeedbackInput},
    error::Result,
};

pub async fn create_feedback(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FeedbackInput>, JsonRejection>,
) -> Result<Json<FeedbackAck>> {
    let entry = json_body(payload)?.validate(Utc::now())?;
    state.feedback.add(entry).await?;

    Ok(Json(FeedbackAck {
        ok: true,
        message: THANK_YOU.to_string(),
    }))
}

/// An unreadable store lists as empty.
pub async fn list_feedback(State(state): State<AppState>) -> Json<Vec<FeedbackEntry>> {
    match state.feedback.list().await {
        Ok(entries) => Json(entries),
        Err(e) => {
            warn!(error = %e, "failed to read feedback");
            Json(Vec::new())
        }
    }
}
