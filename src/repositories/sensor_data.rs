use crate::api::models::{
    Alert, ReadingFilter, ReadingSource, SensorReading, StorageReport, TemperatureLogEntry,
};
use crate::db::{self, Collection, DbPool};
use crate::sensors::TemperatureStatus;
use crate::storage::{BoundedLog, JsonFileStore};
use std::sync::Mutex;
use tracing::{debug, warn};

use super::mirror;

pub const SENSOR_FILE_NAME: &str = "sensor-readings.json";

/// Readings live in a bounded in-memory buffer, the only sink whose write
/// decides the request outcome. The JSON file and the database are mirrors.
pub struct SensorDataRepository {
    memory: Mutex<BoundedLog<SensorReading>>,
    file: Option<JsonFileStore>,
    pool: Option<DbPool>,
    capacity: usize,
}

#[derive(Debug, Clone)]
pub struct AppendOutcome {
    pub reading: SensorReading,
    pub storage: StorageReport,
    pub memory_count: usize,
}

#[derive(Debug, Clone)]
pub struct RecentReadings {
    pub current: Option<SensorReading>,
    pub readings: Vec<SensorReading>,
    pub source: ReadingSource,
}

impl SensorDataRepository {
    pub fn new(capacity: usize, file: Option<JsonFileStore>, pool: Option<DbPool>) -> Self {
        let memory = BoundedLog::new(capacity);
        let capacity = memory.capacity();
        Self {
            memory: Mutex::new(memory),
            file,
            pool,
            capacity,
        }
    }

    pub fn in_memory(capacity: usize) -> Self {
        Self::new(capacity, None, None)
    }

    pub fn memory_count(&self) -> usize {
        self.memory.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub async fn append(&self, reading: SensorReading) -> AppendOutcome {
        let memory_count = match self.memory.lock() {
            Ok(mut memory) => {
                if memory.push(reading.clone()).is_some() {
                    debug!(capacity = self.capacity, "evicted oldest reading");
                }
                memory.len()
            }
            Err(poisoned) => {
                let mut memory = poisoned.into_inner();
                memory.push(reading.clone());
                memory.len()
            }
        };

        let file = self.append_to_file(&reading).await;
        let database = self.append_to_db(&reading).await;

        AppendOutcome {
            reading,
            storage: StorageReport {
                memory: true,
                file,
                database,
            },
            memory_count,
        }
    }

    async fn append_to_file(&self, reading: &SensorReading) -> bool {
        let Some(file) = &self.file else {
            return false;
        };
        let capacity = self.capacity;
        let record = reading.clone();
        let result = file
            .update(move |items: &mut Vec<SensorReading>| {
                items.push(record);
                if items.len() > capacity {
                    let excess = items.len() - capacity;
                    items.drain(..excess);
                }
            })
            .await;
        match result {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %file.path().display(), error = %e, "failed to write sensor file");
                false
            }
        }
    }

    async fn append_to_db(&self, reading: &SensorReading) -> bool {
        let pool = self.pool.as_ref();
        let stored = mirror(pool, Collection::SensorData, reading.timestamp, reading).await;

        if let Some(battery_temp) = reading.battery_temperature {
            let status = TemperatureStatus::classify(Some(battery_temp));
            let log = TemperatureLogEntry {
                timestamp: reading.timestamp,
                battery_temp,
                ambient_temp: reading.temperature,
                status,
                wifi_ssid: reading.wifi_ssid.clone(),
                device_id: reading.device_id.clone(),
            };
            mirror(pool, Collection::TemperatureLogs, reading.timestamp, &log).await;

            if status == TemperatureStatus::Critical {
                warn!(battery_temp, "battery temperature critical");
                let alert = Alert::battery_overheat(reading.timestamp, battery_temp);
                mirror(pool, Collection::Alerts, reading.timestamp, &alert).await;
            }
        }
        stored
    }

    /// Up to `limit` readings of `kind`, newest first, from the first store holding any.
    pub async fn recent(&self, filter: &ReadingFilter, limit: usize) -> RecentReadings {
        let from_memory: Vec<SensorReading> = match self.memory.lock() {
            Ok(memory) => select(memory.recent(memory.len()), filter, limit),
            Err(poisoned) => {
                let memory = poisoned.into_inner();
                select(memory.recent(memory.len()), filter, limit)
            }
        };
        if !from_memory.is_empty() {
            return RecentReadings::new(from_memory, ReadingSource::Memory);
        }

        if let Some(file) = &self.file {
            match file.load::<SensorReading>().await {
                Ok(items) => {
                    let readings = select(items.iter().rev(), filter, limit);
                    if !readings.is_empty() {
                        return RecentReadings::new(readings, ReadingSource::File);
                    }
                }
                Err(e) => warn!(error = %e, "failed to read sensor file"),
            }
        }

        if let Some(pool) = &self.pool {
            match db::recent_documents(pool, Collection::SensorData, self.capacity).await {
                Ok(docs) => {
                    let items: Vec<SensorReading> = docs
                        .into_iter()
                        .filter_map(|doc| serde_json::from_value(doc).ok())
                        .collect();
                    let readings = select(items.iter(), filter, limit);
                    if !readings.is_empty() {
                        return RecentReadings::new(readings, ReadingSource::Database);
                    }
                }
                Err(e) => warn!(error = %e, "failed to read sensor documents"),
            }
        }

        RecentReadings::new(Vec::new(), ReadingSource::Empty)
    }
}

fn select<'a>(
    items: impl Iterator<Item = &'a SensorReading>,
    filter: &ReadingFilter,
    limit: usize,
) -> Vec<SensorReading> {
    items
        .filter(|r| filter.matches(r))
        .take(limit)
        .cloned()
        .collect()
}

impl RecentReadings {
    fn new(readings: Vec<SensorReading>, source: ReadingSource) -> Self {
        Self {
            current: readings.first().cloned(),
            readings,
            source,
        }
    }
}
