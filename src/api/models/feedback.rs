use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub const FIELDS_REQUIRED: &str = "Tous les champs sont requis";
pub const INVALID_RATING: &str = "Note invalide (1-5)";
pub const THANK_YOU: &str = "Merci pour votre avis !";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub rating: u8,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub ok: bool,
    pub message: String,
}

fn required(field: Option<String>) -> Result<String, AppError> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(FIELDS_REQUIRED.to_string()))
}

impl FeedbackInput {
    pub fn validate(self, timestamp: DateTime<Utc>) -> Result<FeedbackEntry, AppError> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let comment = required(self.comment)?;
        let rating = self
            .rating
            .ok_or_else(|| AppError::Validation(FIELDS_REQUIRED.to_string()))?;

        if rating.fract() != 0.0 || !(1.0..=5.0).contains(&rating) {
            return Err(AppError::Validation(INVALID_RATING.to_string()));
        }

        Ok(FeedbackEntry {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            rating: rating as u8,
            comment,
            timestamp,
        })
    }
}
