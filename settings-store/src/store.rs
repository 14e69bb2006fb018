//! Settings store trait and typed helpers

use async_trait::async_trait;
use backsearch_core::*;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::parse::{self, StoredValues};

/// Capacity of the change notification channel
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification that one or more keys changed in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub keys: Vec<String>,
}

impl StorageChange {
    /// Setting keys in this change that the tracker cares about
    pub fn setting_keys(&self) -> Vec<SettingKey> {
        self.keys
            .iter()
            .filter_map(|k| SettingKey::from_key(k))
            .collect()
    }

    /// Whether any changed key is a known setting
    pub fn touches_settings(&self) -> bool {
        !self.setting_keys().is_empty()
    }
}

/// Async key-value store for user settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the values of the given keys; missing keys are absent from the map
    async fn get(&self, keys: &[&str]) -> Result<StoredValues>;

    /// Write a single value and notify subscribers if it changed
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

fn all_keys() -> Vec<&'static str> {
    SettingKey::ALL.iter().map(|k| k.as_str()).collect()
}

/// Load and parse all settings from a store
pub async fn load_settings(store: &dyn SettingsStore) -> Result<Settings> {
    let values = store.get(&all_keys()).await?;
    parse::settings_from_values(&values)
}

/// Load settings key by key over `current`
///
/// A read failure is an error. Keys holding invalid values keep their value
/// from `current` and are returned as rejections.
pub async fn load_settings_over(
    store: &dyn SettingsStore,
    current: &Settings,
) -> Result<(Settings, Vec<BackSearchError>)> {
    let values = store.get(&all_keys()).await?;
    Ok(parse::merge_settings_from_values(&values, current))
}

/// Read only the icon click flag, defaulting to enabled when unset
pub async fn load_icon_click_enabled(store: &dyn SettingsStore) -> Result<bool> {
    let values = store.get(&[SettingKey::IconClickEnabled.as_str()]).await?;
    parse::bool_value(
        &values,
        SettingKey::IconClickEnabled,
        DEFAULT_ICON_CLICK_ENABLED,
    )
}

/// Validate and write one setting
pub async fn save_setting(store: &dyn SettingsStore, key: SettingKey, value: Value) -> Result<()> {
    parse::validate_value(key, &value)?;
    store.set(key.as_str(), value).await
}

/// Write every setting
pub async fn save_settings(store: &dyn SettingsStore, settings: &Settings) -> Result<()> {
    for (key, value) in parse::settings_to_values(settings) {
        store.set(key.as_str(), value).await?;
    }
    Ok(())
}

/// Validate a raw key name and write it
pub async fn save_raw_setting(store: &dyn SettingsStore, key: &str, value: Value) -> Result<()> {
    let key = SettingKey::from_key(key).ok_or_else(|| SettingsError::UnknownKey {
        key: key.to_string(),
    })?;
    save_setting(store, key, value).await
}
