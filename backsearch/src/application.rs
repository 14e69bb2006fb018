/// Main application module
///
/// The `Application` exclusively owns the search tracker and handles host
/// events one at a time. Tracker updates are synchronous; the only await
/// points are settings I/O and the final tab navigation request, so no
/// history mutation ever spans a suspension.

use crate::AppContext;
use backsearch_core::errors::BackSearchError;
use backsearch_core::{ActiveTab, IntentSource, SettingKey, GO_TO_SEARCH_COMMAND};
use browser_connector::{HostEvent, HostEventSender};
use search_history::{BackOutcome, NavigationOutcome, SearchTracker};
use settings_store::{
    load_icon_click_enabled, load_settings_over, save_raw_setting, SettingsStore,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Counters describing what the runtime has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RuntimeStats {
    pub events_handled: usize,
    pub pages_recorded: usize,
    pub navigations_issued: usize,
    pub navigations_failed: usize,
    pub intents_without_navigation: usize,
    pub settings_syncs: usize,
    pub settings_sync_failures: usize,
}

/// Result of handling one host event
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// A navigation was offered to the tracker
    Navigation(NavigationOutcome),
    /// A back-navigation intent was processed
    Back(BackOutcome),
    /// The icon was clicked while icon clicks are disabled
    IconClickDisabled,
    /// A keyboard command other than the back-search command
    UnknownCommand(String),
    /// A closed tab was dropped; true if it had history
    TabForgotten(bool),
    /// Settings were re-read; false if the read failed and the cache was kept
    SettingsSynced(bool),
    /// A settings change touched no known key
    SettingsIgnored,
    /// A setting write was attempted; true on success
    SettingSaved(bool),
}

/// Main application
pub struct Application {
    /// Application context
    context: AppContext,
    /// Search tracking state, owned by the event loop
    tracker: SearchTracker,
    stats: RuntimeStats,
}

impl Application {
    /// Create an application with default settings, without touching the store
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            tracker: SearchTracker::new(),
            stats: RuntimeStats::default(),
        }
    }

    /// Create an application and load settings once before any event is handled
    pub async fn start(context: AppContext) -> Self {
        let mut app = Self::new(context);
        app.sync_settings().await;
        info!("BackSearch started");
        app
    }

    /// Get application context
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn tracker(&self) -> &SearchTracker {
        &self.tracker
    }

    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    /// Re-read settings; on a read failure the current cache stays in effect
    ///
    /// Each key is applied independently, so an invalid value for one key
    /// keeps its cached value without blocking the others.
    pub async fn sync_settings(&mut self) -> bool {
        let store = self.context.settings_store.as_ref();
        match load_settings_over(store, self.tracker.settings()).await {
            Ok((settings, rejected)) => {
                for e in &rejected {
                    self.report(e, "settings sync").await;
                }
                self.tracker.apply_settings(settings);
                self.stats.settings_syncs += 1;
                true
            }
            Err(e) => {
                self.report(&e, "settings sync").await;
                self.stats.settings_sync_failures += 1;
                false
            }
        }
    }

    /// Handle one host event to completion
    pub async fn handle_event(&mut self, event: HostEvent) -> EventOutcome {
        self.stats.events_handled += 1;

        match event {
            HostEvent::NavigationCommitted(navigation) => {
                let outcome = self.tracker.on_navigation(&navigation);
                if outcome.appended() {
                    self.stats.pages_recorded += 1;
                }
                EventOutcome::Navigation(outcome)
            }
            HostEvent::Command { command, tab } => {
                if command != GO_TO_SEARCH_COMMAND {
                    debug!(command = %command, "Ignoring unknown command");
                    return EventOutcome::UnknownCommand(command);
                }
                EventOutcome::Back(self.go_back(&tab, IntentSource::KeyboardCommand).await)
            }
            HostEvent::IconClicked { tab } => {
                if !self.icon_click_enabled().await {
                    info!(tab_id = %tab.id, "Icon click is disabled by options");
                    return EventOutcome::IconClickDisabled;
                }
                EventOutcome::Back(self.go_back(&tab, IntentSource::IconActivation).await)
            }
            HostEvent::TabRemoved { tab_id } => {
                EventOutcome::TabForgotten(self.tracker.on_tab_removed(tab_id).is_some())
            }
            HostEvent::SettingsChanged { keys } => {
                if keys.iter().any(|k| SettingKey::from_key(k).is_some()) {
                    EventOutcome::SettingsSynced(self.sync_settings().await)
                } else {
                    EventOutcome::SettingsIgnored
                }
            }
            HostEvent::SetSetting { key, value } => {
                let store = self.context.settings_store.as_ref();
                match save_raw_setting(store, &key, value).await {
                    Ok(()) => {
                        info!(key = %key, "Setting updated");
                        EventOutcome::SettingSaved(true)
                    }
                    Err(e) => {
                        self.report(&e, "setting write").await;
                        EventOutcome::SettingSaved(false)
                    }
                }
            }
        }
    }

    /// Handle events until every sender is gone
    pub async fn run(mut self, mut events: mpsc::Receiver<HostEvent>) -> RuntimeStats {
        info!("Running event loop");

        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }

        info!(stats = ?self.stats, "Event loop finished");
        self.stats
    }

    /// Icon clicks read the flag fresh from the store, falling back to the cache
    async fn icon_click_enabled(&self) -> bool {
        match load_icon_click_enabled(self.context.settings_store.as_ref()).await {
            Ok(enabled) => enabled,
            Err(e) => {
                self.report(&e, "icon click setting").await;
                self.tracker.icon_click_enabled()
            }
        }
    }

    async fn go_back(&mut self, tab: &ActiveTab, source: IntentSource) -> BackOutcome {
        let outcome = self.tracker.go_back(tab);

        match &outcome {
            BackOutcome::Navigate(request) => {
                match self.context.tab_controller.navigate_tab(request).await {
                    Ok(()) => {
                        info!(tab_id = %request.tab_id, ?source, "Navigating to {}", request.url);
                        self.stats.navigations_issued += 1;
                    }
                    Err(e) => {
                        self.report(&e, "tab navigation").await;
                        self.stats.navigations_failed += 1;
                    }
                }
            }
            other => {
                debug!(tab_id = %tab.id, ?source, outcome = ?other, "No navigation issued");
                self.stats.intents_without_navigation += 1;
            }
        }

        outcome
    }

    async fn report(&self, error: &BackSearchError, context: &str) {
        self.context.error_handler.handle_error(error, context).await;
    }
}

/// Forward settings store changes into the host event queue
///
/// Changes are delivered as `SettingsChanged` events so they are ordered
/// with navigation and intent events. If the subscription lags, a change of
/// every key is sent to force a full re-read.
pub fn spawn_settings_forwarder(
    store: Arc<dyn SettingsStore>,
    sender: HostEventSender,
) -> JoinHandle<()> {
    let mut changes = store.subscribe();

    tokio::spawn(async move {
        loop {
            let keys = match changes.recv().await {
                Ok(change) if change.touches_settings() => change.keys,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "Settings change notifications lagged");
                    SettingKey::ALL.iter().map(|k| k.as_str().to_string()).collect()
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if sender.settings_changed(keys).await.is_err() {
                break;
            }
        }
        debug!("Settings forwarder stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppConfig;
    use async_trait::async_trait;
    use backsearch_core::{NavigateRequest, NavigationEvent, TabId};
    use browser_connector::TabController;
    use settings_store::MemorySettingsStore;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingController {
        requests: Mutex<Vec<NavigateRequest>>,
    }

    #[async_trait]
    impl TabController for RecordingController {
        async fn navigate_tab(
            &self,
            request: &NavigateRequest,
        ) -> backsearch_core::errors::Result<()> {
            self.requests.lock().await.push(request.clone());
            Ok(())
        }
    }

    fn app_with(store: Arc<MemorySettingsStore>) -> (Application, Arc<RecordingController>) {
        let controller = Arc::new(RecordingController::default());
        let context = AppContext::with_store(AppConfig::default(), store, controller.clone());
        (Application::new(context), controller)
    }

    #[tokio::test]
    async fn test_application_creation() {
        let (app, _) = app_with(Arc::new(MemorySettingsStore::new()));
        assert_eq!(app.stats(), RuntimeStats::default());
        assert!(app.tracker().icon_click_enabled());
    }

    #[tokio::test]
    async fn test_unknown_command_ignored() {
        let (mut app, controller) = app_with(Arc::new(MemorySettingsStore::new()));
        app.handle_event(HostEvent::NavigationCommitted(NavigationEvent::top_level(
            TabId(1),
            "https://google.com/search?q=a",
        )))
        .await;

        let outcome = app
            .handle_event(HostEvent::Command {
                command: "open-options".to_string(),
                tab: ActiveTab::new(TabId(1), "https://example.com"),
            })
            .await;

        assert_eq!(outcome, EventOutcome::UnknownCommand("open-options".to_string()));
        assert!(controller.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_settings_changed_for_unrelated_key() {
        let (mut app, _) = app_with(Arc::new(MemorySettingsStore::new()));

        let outcome = app
            .handle_event(HostEvent::SettingsChanged {
                keys: vec!["theme".to_string()],
            })
            .await;

        assert_eq!(outcome, EventOutcome::SettingsIgnored);
        assert_eq!(app.stats().settings_syncs, 0);
    }

    #[tokio::test]
    async fn test_set_setting_writes_store() {
        let store = Arc::new(MemorySettingsStore::new());
        let (mut app, _) = app_with(store.clone());

        let outcome = app
            .handle_event(HostEvent::SetSetting {
                key: "iconClickEnabled".to_string(),
                value: serde_json::json!(false),
            })
            .await;

        assert_eq!(outcome, EventOutcome::SettingSaved(true));
        assert!(!load_icon_click_enabled(store.as_ref()).await.unwrap());
    }
}
