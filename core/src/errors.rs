use thiserror::Error;
use crate::types::TabId;

/// Settings store related errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings read failed: {reason}")]
    ReadFailed { reason: String },

    #[error("Settings write failed: {reason}")]
    WriteFailed { reason: String },

    #[error("Invalid value for setting {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown setting key: {key}")]
    UnknownKey { key: String },
}

/// Browser host related errors
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Navigation of tab {tab_id} rejected: {reason}")]
    NavigationRejected { tab_id: TabId, reason: String },

    #[error("Event channel closed")]
    ChannelClosed,

    #[error("Malformed host message: {details}")]
    Protocol { details: String },
}

/// General system errors
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {details}")]
    Configuration { details: String },

    #[error("IO error: {source}")]
    IO {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Main error type for the application
#[derive(Debug, Error)]
pub enum BackSearchError {
    #[error("Settings error: {source}")]
    Settings {
        #[from]
        source: SettingsError,
    },

    #[error("Host error: {source}")]
    Host {
        #[from]
        source: HostError,
    },

    #[error("System error: {source}")]
    System {
        #[from]
        source: SystemError,
    },
}

impl From<std::io::Error> for BackSearchError {
    fn from(source: std::io::Error) -> Self {
        SystemError::from(source).into()
    }
}

impl From<serde_json::Error> for BackSearchError {
    fn from(source: serde_json::Error) -> Self {
        SystemError::from(source).into()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BackSearchError>;
