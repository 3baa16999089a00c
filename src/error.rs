use std::path::PathBuf;
use thiserror::Error;

/// Main error type for propwizard operations
#[derive(Debug, Error)]
pub enum PropwizardError {
    #[error("Unknown configuration field '{field}': no external key is registered for it")]
    UnresolvableField { field: String },

    #[error("Failed to write '{}': {details}", .path.display())]
    PersistenceFailure { path: PathBuf, details: String },

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("Input closed while waiting for a response")]
    InputClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoadError(#[from] config::ConfigError),

    #[error("Field registry error: {0}")]
    RegistryError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl PropwizardError {
    pub fn unresolvable_field<S: Into<String>>(field: S) -> Self {
        Self::UnresolvableField {
            field: field.into(),
        }
    }

    pub fn persistence<P: Into<PathBuf>, S: Into<String>>(path: P, details: S) -> Self {
        Self::PersistenceFailure {
            path: path.into(),
            details: details.into(),
        }
    }

    pub fn terminal<S: Into<String>>(msg: S) -> Self {
        Self::TerminalError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn registry<S: Into<String>>(msg: S) -> Self {
        Self::RegistryError(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type alias for propwizard operations
pub type Result<T> = std::result::Result<T, PropwizardError>;
