//! Search tracker state
//!
//! Single owned state object holding the per-tab history store and the
//! cached settings. Every handler takes `&mut self`, so the owner decides
//! how events are serialized; no interior locking is used.

use backsearch_core::{ActiveTab, NavigationEvent, Settings, TabId};
use serde::Serialize;
use tracing::{debug, info};

use crate::history::{HistoryStore, TabHistory};
use crate::matcher::SearchPageMatcher;
use crate::navigator::{navigate_back, BackOutcome};
use crate::recorder::{record_navigation, NavigationOutcome};

/// Serializable view of one tab's history, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabHistorySnapshot {
    pub tab_id: TabId,
    pub entries: Vec<String>,
    pub cursor: usize,
}

/// Process-wide search tracking state
#[derive(Debug, Default)]
pub struct SearchTracker {
    store: HistoryStore,
    matcher: SearchPageMatcher,
    settings: Settings,
}

impl SearchTracker {
    /// Create a tracker with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with the given settings already applied
    pub fn with_settings(settings: Settings) -> Self {
        let mut tracker = Self::new();
        tracker.apply_settings(settings);
        tracker
    }

    /// Replace the cached settings
    pub fn apply_settings(&mut self, settings: Settings) {
        self.matcher.apply_settings(&settings);
        info!(
            patterns = ?settings.custom_search_patterns,
            excluded = ?settings.exclude_domains,
            icon_click_enabled = settings.icon_click_enabled,
            "Settings updated"
        );
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn matcher(&self) -> &SearchPageMatcher {
        &self.matcher
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn icon_click_enabled(&self) -> bool {
        self.settings.icon_click_enabled
    }

    /// Handle a committed navigation
    pub fn on_navigation(&mut self, event: &NavigationEvent) -> NavigationOutcome {
        record_navigation(&mut self.store, &self.matcher, event)
    }

    /// Handle a back-navigation intent for the active tab
    pub fn go_back(&mut self, tab: &ActiveTab) -> BackOutcome {
        navigate_back(&mut self.store, &self.matcher, tab)
    }

    /// Handle a tab being closed
    pub fn on_tab_removed(&mut self, tab_id: TabId) -> Option<TabHistory> {
        let removed = self.store.forget(tab_id);
        if let Some(history) = &removed {
            debug!(tab_id = %tab_id, entries = history.len(), "Dropped search history");
        }
        removed
    }

    /// Snapshot of a tab's history, if it has one
    pub fn snapshot(&self, tab_id: TabId) -> Option<TabHistorySnapshot> {
        self.store.history(tab_id).map(|history| TabHistorySnapshot {
            tab_id,
            entries: history.entries().to_vec(),
            cursor: history.cursor(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_change_affects_classification() {
        let mut tracker = SearchTracker::new();
        let url = "https://kagi.com/search?q=rust";

        assert!(!tracker.on_navigation(&NavigationEvent::top_level(TabId(1), url)).appended());

        tracker.apply_settings(Settings {
            custom_search_patterns: vec!["kagi.com/search".to_string()],
            ..Settings::default()
        });

        assert!(tracker.on_navigation(&NavigationEvent::top_level(TabId(1), url)).appended());
    }

    #[test]
    fn test_settings_change_keeps_existing_history() {
        let mut tracker = SearchTracker::new();
        let url = "https://google.com/search?q=x";
        tracker.on_navigation(&NavigationEvent::top_level(TabId(1), url));

        tracker.apply_settings(Settings {
            exclude_domains: vec!["google.com".to_string()],
            ..Settings::default()
        });

        assert_eq!(tracker.snapshot(TabId(1)).unwrap().entries, vec![url.to_string()]);
    }

    #[test]
    fn test_tab_removed_forgets_history() {
        let mut tracker = SearchTracker::new();
        tracker.on_navigation(&NavigationEvent::top_level(TabId(3), "https://bing.com/search?q=a"));

        assert!(tracker.on_tab_removed(TabId(3)).is_some());
        assert!(tracker.snapshot(TabId(3)).is_none());
        assert!(tracker.on_tab_removed(TabId(3)).is_none());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut tracker = SearchTracker::new();
        tracker.on_navigation(&NavigationEvent::top_level(TabId(2), "https://bing.com/search?q=a"));

        let json = serde_json::to_value(tracker.snapshot(TabId(2)).unwrap()).unwrap();
        assert_eq!(json["tabId"], 2);
        assert_eq!(json["cursor"], 0);
    }

    #[test]
    fn test_icon_click_follows_settings() {
        let mut tracker = SearchTracker::new();
        assert!(tracker.icon_click_enabled());

        tracker.apply_settings(Settings {
            icon_click_enabled: false,
            ..Settings::default()
        });
        assert!(!tracker.icon_click_enabled());
    }
}
