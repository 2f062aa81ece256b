pub mod feedback;
pub mod login_logs;
pub mod sensor_data;
pub mod system_status;
pub mod temperature_logs;

pub use feedback::FeedbackRepository;
pub use login_logs::LoginLogRepository;
pub use sensor_data::{AppendOutcome, RecentReadings, SensorDataRepository};
pub use system_status::SystemStatusRepository;
pub use temperature_logs::TemperatureLogRepository;

use crate::db::{self, Collection, DbPool};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Best-effort copy into the document database. Failures are logged, never returned.
pub(crate) async fn mirror<T: Serialize>(
    pool: Option<&DbPool>,
    collection: Collection,
    ts: DateTime<Utc>,
    record: &T,
) -> bool {
    let Some(pool) = pool else {
        return false;
    };
    let doc = match serde_json::to_value(record) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(collection = collection.table(), error = %e, "failed to encode document");
            return false;
        }
    };
    match db::insert_document(pool, collection, ts, &doc).await {
        Ok(_) => true,
        Err(e) => {
            warn!(collection = collection.table(), error = %e, "database write failed");
            false
        }
    }
}
