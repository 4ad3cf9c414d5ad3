//! Error types for the product search pipeline.

use product_search_repository::IndexError;
use thiserror::Error;

/// Errors that can occur in the product search pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The event is malformed; redelivering it will not help.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from the index.
    #[error("Index error: {0}")]
    IndexError(#[from] IndexError),

    /// The delivered batch could not be decoded at all.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl PipelineError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether the failure comes from the event itself rather than the index.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::IndexError(IndexError::ValidationError(_))
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
