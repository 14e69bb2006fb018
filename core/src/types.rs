//! Shared domain types for BackSearch
//!
//! These types are exchanged between the history core, the settings store
//! and the browser host connector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the keyboard command that triggers a back-step through search history
pub const GO_TO_SEARCH_COMMAND: &str = "go-to-search";

/// Value of `iconClickEnabled` when the key has never been written
pub const DEFAULT_ICON_CLICK_ENABLED: bool = true;

/// Browser-assigned tab identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frame identifier within a tab; `0` is the main frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub i64);

impl FrameId {
    /// The main (top-level) frame of a tab
    pub const TOP_LEVEL: FrameId = FrameId(0);

    pub fn is_top_level(self) -> bool {
        self == Self::TOP_LEVEL
    }
}

/// A committed navigation reported by the host, in any frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub tab_id: TabId,
    pub url: String,
    #[serde(default)]
    pub frame_id: FrameId,
}

impl NavigationEvent {
    pub fn new(tab_id: TabId, url: impl Into<String>, frame_id: FrameId) -> Self {
        Self {
            tab_id,
            url: url.into(),
            frame_id,
        }
    }

    /// Create a main-frame navigation event
    pub fn top_level(tab_id: TabId, url: impl Into<String>) -> Self {
        Self::new(tab_id, url, FrameId::TOP_LEVEL)
    }
}

/// The tab a user intent was issued from, with the url it currently displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTab {
    pub id: TabId,
    pub url: String,
}

impl ActiveTab {
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self { id, url: url.into() }
    }
}

/// Where a back-navigation intent came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentSource {
    KeyboardCommand,
    IconActivation,
}

/// Request to point a tab at a new url
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub tab_id: TabId,
    pub url: String,
}

/// Keys understood by the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    CustomSearchPatterns,
    ExcludeDomains,
    IconClickEnabled,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::CustomSearchPatterns,
        SettingKey::ExcludeDomains,
        SettingKey::IconClickEnabled,
    ];

    /// Storage key name
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::CustomSearchPatterns => "customSearchPatterns",
            SettingKey::ExcludeDomains => "excludeDomains",
            SettingKey::IconClickEnabled => "iconClickEnabled",
        }
    }

    /// Look up a key by its storage name
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Whether a change to this key affects url classification
    pub fn affects_patterns(&self) -> bool {
        matches!(
            self,
            SettingKey::CustomSearchPatterns | SettingKey::ExcludeDomains
        )
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings, parsed from the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Extra substrings that mark a url as a search page
    pub custom_search_patterns: Vec<String>,
    /// Substrings that exclude a url from ever being a search page
    pub exclude_domains: Vec<String>,
    /// Whether the toolbar icon triggers a back-step
    pub icon_click_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_search_patterns: Vec::new(),
            exclude_domains: Vec::new(),
            icon_click_enabled: DEFAULT_ICON_CLICK_ENABLED,
        }
    }
}
