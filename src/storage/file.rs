use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;

/// A JSON array persisted to a single writable file.
///
/// When the writable file is missing or unreadable, the bundled seed file (if
/// any) is read instead and copied to the writable location for later writes.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    seed: Option<PathBuf>,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, seed: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        let _guard = self.lock.lock().await;
        self.load_unlocked().await
    }

    /// Read-modify-write under the store lock. `f` may reorder or truncate.
    pub async fn update<T, F>(&self, f: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Serialize + Clone,
        F: FnOnce(&mut Vec<T>),
    {
        let _guard = self.lock.lock().await;
        let mut items = self.load_unlocked().await?;
        f(&mut items);
        write_json(&self.path, &items).await?;
        Ok(items)
    }

    async fn load_unlocked<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        match read_json(&self.path).await {
            Ok(items) => return Ok(items),
            Err(e) => debug!(path = %self.path.display(), error = %e, "writable file not usable"),
        }

        let Some(seed) = &self.seed else {
            return Ok(Vec::new());
        };

        match read_json::<T>(seed).await {
            Ok(items) => {
                if let Err(e) = write_json(&self.path, &items).await {
                    warn!(path = %self.path.display(), error = %e, "failed to copy seed file");
                }
                Ok(items)
            }
            Err(e) => {
                debug!(path = %seed.display(), error = %e, "seed file not usable");
                Ok(Vec::new())
            }
        }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = tokio::fs::read_to_string(path).await?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&raw)?)
}

async fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let body = serde_json::to_string_pretty(items)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}
