/// BackSearch runtime
///
/// Wires the search history tracker to the browser host and the settings
/// store: host events are queued, handled one at a time in delivery order,
/// and back-navigations are sent to the host as tab navigation commands.

use backsearch_core::errors::Result;
use browser_connector::TabController;
use settings_store::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub mod application;
pub mod error_handler;
pub mod logger;

pub use application::{spawn_settings_forwarder, Application, EventOutcome, RuntimeStats};
pub use error_handler::{ErrorSeverity, ErrorStatistics, UnifiedErrorHandler};
pub use logger::{LoggerConfig, UnifiedLogger};

/// Environment variable for the settings file path
pub const ENV_SETTINGS_PATH: &str = "BACKSEARCH_SETTINGS_PATH";

/// Environment variable for the log level
pub const ENV_LOG_LEVEL: &str = "BACKSEARCH_LOG_LEVEL";

/// Environment variable for the host event queue capacity
pub const ENV_QUEUE_CAPACITY: &str = "BACKSEARCH_QUEUE_CAPACITY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
    /// Settings file path; settings are kept in memory when unset
    pub settings_path: Option<PathBuf>,

    /// Log level
    pub log_level: String,

    /// Capacity of the host event queue
    pub event_queue_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            log_level: "info".to_string(),
            event_queue_capacity: browser_connector::DEFAULT_EVENT_QUEUE_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables over the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_SETTINGS_PATH).filter(|p| !p.trim().is_empty()) {
            config.settings_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|l| !l.trim().is_empty()) {
            config.log_level = level;
        }

        // zero or unparsable capacities keep the default
        if let Some(capacity) = lookup(ENV_QUEUE_CAPACITY)
            .and_then(|c| c.trim().parse::<usize>().ok())
            .filter(|c| *c > 0)
        {
            config.event_queue_capacity = capacity;
        }

        config
    }
}

/// Application context that holds all initialized components
pub struct AppContext {
    /// Settings persistence
    pub settings_store: Arc<dyn SettingsStore>,

    /// Navigation command sink
    pub tab_controller: Arc<dyn TabController>,

    /// Unified error handler
    pub error_handler: Arc<UnifiedErrorHandler>,

    /// Application configuration
    pub config: AppConfig,
}

impl AppContext {
    /// Create a context, opening the settings store the config names
    pub async fn new(config: AppConfig, tab_controller: Arc<dyn TabController>) -> Result<Self> {
        info!("Initializing application context");

        let settings_store: Arc<dyn SettingsStore> = match &config.settings_path {
            Some(path) => Arc::new(JsonFileSettingsStore::open(path).await?),
            None => Arc::new(MemorySettingsStore::new()),
        };

        Ok(Self::with_store(config, settings_store, tab_controller))
    }

    /// Create a context around an existing settings store
    pub fn with_store(
        config: AppConfig,
        settings_store: Arc<dyn SettingsStore>,
        tab_controller: Arc<dyn TabController>,
    ) -> Self {
        Self {
            settings_store,
            tab_controller,
            error_handler: Arc::new(UnifiedErrorHandler::new()),
            config,
        }
    }
}
