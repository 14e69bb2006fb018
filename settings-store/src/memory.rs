//! In-memory settings store

use async_trait::async_trait;
use backsearch_core::*;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::parse::StoredValues;
use crate::store::{SettingsStore, StorageChange, CHANGE_CHANNEL_CAPACITY};

/// Settings store that lives only for the process lifetime
pub struct MemorySettingsStore {
    values: RwLock<StoredValues>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::with_values(StoredValues::new())
    }

    /// Create a store pre-populated with values
    pub fn with_values(values: StoredValues) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(values),
            changes,
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, keys: &[&str]) -> Result<StoredValues> {
        let values = self.values.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let previous = self.values.write().await.insert(key.to_string(), value.clone());
        if previous.as_ref() != Some(&value) {
            debug!(key, "Setting updated");
            // no subscribers is fine
            let _ = self.changes.send(StorageChange {
                keys: vec![key.to_string()],
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
