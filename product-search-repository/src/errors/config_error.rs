//! Configuration error types.

use thiserror::Error;

/// Errors raised while reading process configuration.
///
/// These are fatal: a process that hits one must not serve traffic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or empty.
    #[error("Missing configuration: {0}")]
    Missing(String),

    /// A setting is present but unusable.
    #[error("Invalid configuration for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    /// Create a missing-setting error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing(key.into())
    }

    /// Create an invalid-setting error.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
