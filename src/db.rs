use crate::config::DbConfig;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, Row};

pub type DbPool = Pool<Postgres>;

/// One document table per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    SensorData,
    TemperatureLogs,
    SystemStatus,
    Alerts,
    UserLogs,
    Feedback,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::SensorData,
        Collection::TemperatureLogs,
        Collection::SystemStatus,
        Collection::Alerts,
        Collection::UserLogs,
        Collection::Feedback,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Collection::SensorData => "sensor_data",
            Collection::TemperatureLogs => "temperature_logs",
            Collection::SystemStatus => "system_status",
            Collection::Alerts => "alerts",
            Collection::UserLogs => "user_logs",
            Collection::Feedback => "feedback",
        }
    }
}

pub async fn connect(cfg: &DbConfig) -> Result<DbPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.url)
        .await?;
    Ok(pool)
}

pub async fn ensure_schema(pool: &DbPool) -> Result<(), AppError> {
    for collection in Collection::ALL {
        let table = collection.table();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                ts TIMESTAMPTZ NOT NULL,
                doc JSONB NOT NULL
            )"
        );
        sqlx::query(&ddl).execute(pool).await?;
        let index = format!("CREATE INDEX IF NOT EXISTS {table}_ts_idx ON {table} (ts DESC)");
        sqlx::query(&index).execute(pool).await?;
    }
    Ok(())
}

pub async fn insert_document(
    pool: &DbPool,
    collection: Collection,
    ts: DateTime<Utc>,
    doc: &Value,
) -> Result<i64, AppError> {
    let sql = format!(
        "INSERT INTO {} (ts, doc) VALUES ($1, $2) RETURNING id",
        collection.table()
    );
    let row = sqlx::query(&sql).bind(ts).bind(doc).fetch_one(pool).await?;
    Ok(row.try_get("id")?)
}

/// Newest first.
pub async fn recent_documents(
    pool: &DbPool,
    collection: Collection,
    limit: usize,
) -> Result<Vec<Value>, AppError> {
    let sql = format!(
        "SELECT doc FROM {} ORDER BY ts DESC, id DESC LIMIT $1",
        collection.table()
    );
    let rows = sqlx::query(&sql)
        .bind(limit as i64)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| row.try_get::<Value, _>("doc").map_err(AppError::from))
        .collect()
}

/// Documents stamped at or after `since`, newest first. With `device_id`,
/// only documents whose `deviceId` matches.
pub async fn documents_since(
    pool: &DbPool,
    collection: Collection,
    since: DateTime<Utc>,
    device_id: Option<&str>,
    limit: usize,
) -> Result<Vec<Value>, AppError> {
    let sql = format!(
        "SELECT doc FROM {} \
         WHERE ts >= $1 AND ($2::text IS NULL OR doc->>'deviceId' = $2) \
         ORDER BY ts DESC, id DESC LIMIT $3",
        collection.table()
    );
    let rows = sqlx::query(&sql)
        .bind(since)
        .bind(device_id)
        .bind(limit as i64)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| row.try_get::<Value, _>("doc").map_err(AppError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_tables_are_unique() {
        let mut tables: Vec<&str> = Collection::ALL.iter().map(|c| c.table()).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), Collection::ALL.len());
    }
}
