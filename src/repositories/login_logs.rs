use crate::api::models::LoginLogEntry;
use crate::db::{Collection, DbPool};
use crate::error::Result;
use crate::storage::JsonFileStore;

use super::mirror;

pub const LOGIN_LOG_FILE_NAME: &str = "login-logs.json";

/// Login audit trail, oldest first, keeping the most recent `capacity` entries.
pub struct LoginLogRepository {
    file: JsonFileStore,
    pool: Option<DbPool>,
    capacity: usize,
}

impl LoginLogRepository {
    pub fn new(file: JsonFileStore, pool: Option<DbPool>, capacity: usize) -> Self {
        Self {
            file,
            pool,
            capacity: capacity.max(1),
        }
    }

    pub async fn append(&self, entry: LoginLogEntry) -> Result<()> {
        let capacity = self.capacity;
        let record = entry.clone();
        self.file
            .update(move |items: &mut Vec<LoginLogEntry>| {
                items.push(record);
                if items.len() > capacity {
                    let excess = items.len() - capacity;
                    items.drain(..excess);
                }
            })
            .await?;

        mirror(self.pool.as_ref(), Collection::UserLogs, entry.timestamp, &entry).await;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<LoginLogEntry>> {
        self.file.load().await
    }
}
