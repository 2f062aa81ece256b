use chrono::{Duration, Utc};
use tracing::warn;

use crate::api::models::temperature_logs::{TemperatureLogEntry, MAX_ENTRIES};
use crate::db::{self, Collection, DbPool};
use crate::error::{AppError, Result};

/// Battery temperature history. Written directly by devices or as a side
/// effect of sensor-data ingestion.
pub struct TemperatureLogRepository {
    pool: Option<DbPool>,
}

impl TemperatureLogRepository {
    pub fn new(pool: Option<DbPool>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> Result<&DbPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Storage("database not configured".to_string()))
    }

    pub async fn record(&self, entry: &TemperatureLogEntry) -> Result<i64> {
        let doc = serde_json::to_value(entry)?;
        db::insert_document(self.pool()?, Collection::TemperatureLogs, entry.timestamp, &doc).await
    }

    /// Entries from the last `hours`, newest first, optionally for one device.
    pub async fn since_hours(
        &self,
        hours: i64,
        device_id: Option<&str>,
    ) -> Result<Vec<TemperatureLogEntry>> {
        let since = Utc::now() - Duration::hours(hours);
        let docs = db::documents_since(
            self.pool()?,
            Collection::TemperatureLogs,
            since,
            device_id,
            MAX_ENTRIES,
        )
        .await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value(doc) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping malformed temperature log");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::TemperatureLogInput;

    #[tokio::test]
    async fn test_record_without_database_is_a_storage_error() {
        let repo = TemperatureLogRepository::new(None);
        let entry = TemperatureLogInput {
            battery_temp: Some(30.0),
            device_id: Some("esp32-roof".into()),
            ..Default::default()
        }
        .validate(Utc::now())
        .unwrap();

        assert!(matches!(repo.record(&entry).await, Err(AppError::Storage(_))));
        assert!(matches!(
            repo.since_hours(24, Some("esp32-roof")).await,
            Err(AppError::Storage(_))
        ));
    }
}
