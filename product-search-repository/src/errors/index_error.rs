//! Index mutation error types.

use thiserror::Error;

use crate::errors::TransportError;

/// Errors that can occur while writing to or deleting from the index.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// The mutation was malformed and was never sent.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The index service rejected the mutation.
    #[error("Index rejected {entity_key} with status {status}: {body}")]
    Rejected {
        entity_key: String,
        status: u16,
        body: String,
    },

    /// The index service could not be reached.
    #[error("Transport error: {0}")]
    TransportError(TransportError),

    /// The document could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Classify a gateway failure for the given document.
    ///
    /// A non-2xx answer is a rejection by the index; anything else is a
    /// transport failure.
    pub fn from_transport(entity_key: &str, err: TransportError) -> Self {
        match err {
            TransportError::UnexpectedStatus { status, body } => Self::Rejected {
                entity_key: entity_key.to_string(),
                status,
                body,
            },
            other => Self::TransportError(other),
        }
    }
}
