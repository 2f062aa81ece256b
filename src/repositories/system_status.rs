use crate::api::models::SystemStatusRecord;
use crate::db::{self, Collection, DbPool};
use crate::error::{AppError, Result};

/// Status snapshots live only in the database.
pub struct SystemStatusRepository {
    pool: Option<DbPool>,
}

impl SystemStatusRepository {
    pub fn new(pool: Option<DbPool>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> Result<&DbPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Storage("database not configured".to_string()))
    }

    pub async fn record(&self, record: &SystemStatusRecord) -> Result<i64> {
        let doc = serde_json::to_value(record)?;
        db::insert_document(self.pool()?, Collection::SystemStatus, record.timestamp, &doc).await
    }

    pub async fn latest(&self) -> Result<Option<SystemStatusRecord>> {
        let docs = db::recent_documents(self.pool()?, Collection::SystemStatus, 1).await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_without_database_is_a_storage_error() {
        let repo = SystemStatusRepository::new(None);
        let err = repo.latest().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
