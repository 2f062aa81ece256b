use crate::api::models::FeedbackEntry;
use crate::db::{Collection, DbPool};
use crate::error::Result;
use crate::storage::JsonFileStore;

use super::mirror;

pub const FEEDBACK_FILE_NAME: &str = "feedback.json";

/// Feedback entries, newest first, capped.
pub struct FeedbackRepository {
    file: JsonFileStore,
    pool: Option<DbPool>,
    capacity: usize,
}

impl FeedbackRepository {
    pub fn new(file: JsonFileStore, pool: Option<DbPool>, capacity: usize) -> Self {
        Self {
            file,
            pool,
            capacity: capacity.max(1),
        }
    }

    pub async fn add(&self, entry: FeedbackEntry) -> Result<()> {
        let capacity = self.capacity;
        let record = entry.clone();
        self.file
            .update(move |items: &mut Vec<FeedbackEntry>| {
                items.insert(0, record);
                items.truncate(capacity);
            })
            .await?;

        mirror(self.pool.as_ref(), Collection::Feedback, entry.timestamp, &entry).await;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<FeedbackEntry>> {
        self.file.load().await
    }
}
