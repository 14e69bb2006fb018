/// Unified logger for centralized logging configuration
///
/// Logs are written to stderr; stdout is reserved for host commands.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Include thread IDs
    pub include_thread_ids: bool,

    /// Include target module paths
    pub include_targets: bool,

    /// Emit ANSI colors
    pub ansi: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            include_thread_ids: false,
            include_targets: true,
            ansi: false,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }
}

/// Unified logger
pub struct UnifiedLogger;

impl UnifiedLogger {
    /// Initialize the global logger
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(config: LoggerConfig) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_targets)
            .with_thread_ids(config.include_thread_ids)
            .with_ansi(config.ansi);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;

        tracing::info!("Logging initialized with level: {}", config.level);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_config_default() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.ansi);
    }

    #[test]
    fn test_logger_config_with_level() {
        let config = LoggerConfig::with_level("debug");
        assert_eq!(config.level, "debug");
        assert!(config.include_targets);
    }
}
