use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(schedule_exporter::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(schedule_exporter::config))]
    Config(String),

    #[error("Markup error: {0}")]
    #[diagnostic(code(schedule_exporter::markup))]
    Markup(String),

    #[error("Calendar sync rejected: {0}")]
    #[diagnostic(code(schedule_exporter::sync_failure))]
    SyncFailure(String),

    #[error("Network error: {0}")]
    #[diagnostic(code(schedule_exporter::network))]
    Network(String),

    #[error("No entry attached to the context menu")]
    #[diagnostic(code(schedule_exporter::missing_attachment))]
    MissingAttachment,

    #[error("Component error: {0}")]
    #[diagnostic(code(schedule_exporter::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(schedule_exporter::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(schedule_exporter::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(schedule_exporter::other))]
    Other(String),
}

// Transport failures (unreachable endpoint, timeout, unparsable body) all
// collapse into the single user-visible network outcome.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create markup errors
pub fn markup_error(message: &str) -> Error {
    Error::Markup(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create network errors
pub fn network_error(message: &str) -> Error {
    Error::Network(message.to_string())
}
