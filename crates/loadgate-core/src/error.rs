//! Error types for loadgate-core

use thiserror::Error;

/// Result type alias using loadgate-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for loadgate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// Retry policy rejected by validation
    #[error("Invalid retry policy{}: {message}", operation_suffix(.operation))]
    InvalidRetryPolicy {
        operation: Option<String>,
        message: String,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn operation_suffix(operation: &Option<String>) -> String {
    operation
        .as_ref()
        .map(|op| format!(" for '{}'", op))
        .unwrap_or_default()
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid retry policy error
    pub fn invalid_retry_policy(message: impl Into<String>) -> Self {
        Self::InvalidRetryPolicy {
            operation: None,
            message: message.into(),
        }
    }

    /// Attach the operation name to an invalid retry policy error
    pub fn for_operation(self, operation: impl Into<String>) -> Self {
        match self {
            Self::InvalidRetryPolicy { message, .. } => Self::InvalidRetryPolicy {
                operation: Some(operation.into()),
                message,
            },
            other => other,
        }
    }
}
