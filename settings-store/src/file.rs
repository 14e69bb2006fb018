//! JSON file backed settings store
//!
//! The whole key-value map is kept in memory and rewritten to disk on every
//! change, via a temporary file and rename.

use async_trait::async_trait;
use backsearch_core::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::parse::StoredValues;
use crate::store::{SettingsStore, StorageChange, CHANGE_CHANNEL_CAPACITY};

/// Settings store persisted as a single JSON object
pub struct JsonFileSettingsStore {
    path: PathBuf,
    values: RwLock<StoredValues>,
    changes: broadcast::Sender<StorageChange>,
}

impl JsonFileSettingsStore {
    /// Open the store at `path`; a missing file is an empty store
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = read_values(&path).await?;
        info!(path = %path.display(), keys = values.len(), "Opened settings file");

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            values: RwLock::new(values),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_values(path: &Path) -> Result<StoredValues> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredValues::new()),
        Err(e) => {
            return Err(SettingsError::ReadFailed {
                reason: format!("{}: {}", path.display(), e),
            }
            .into())
        }
    };

    if contents.trim().is_empty() {
        return Ok(StoredValues::new());
    }

    serde_json::from_str(&contents).map_err(|e| {
        SettingsError::ReadFailed {
            reason: format!("{}: {}", path.display(), e),
        }
        .into()
    })
}

fn write_failed(path: &Path, e: impl std::fmt::Display) -> BackSearchError {
    SettingsError::WriteFailed {
        reason: format!("{}: {}", path.display(), e),
    }
    .into()
}

async fn write_values(path: &Path, values: &StoredValues) -> Result<()> {
    let json = serde_json::to_string_pretty(values).map_err(|e| write_failed(path, e))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| write_failed(path, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| write_failed(path, e))?;
    Ok(())
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn get(&self, keys: &[&str]) -> Result<StoredValues> {
        let values = self.values.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().await;
        if values.get(key) == Some(&value) {
            return Ok(());
        }

        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        write_values(&self.path, &updated).await?;
        *values = updated;
        drop(values);

        debug!(key, path = %self.path.display(), "Setting persisted");
        let _ = self.changes.send(StorageChange {
            keys: vec![key.to_string()],
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
