//! Transport and signing error types.
//!
//! Every call to the index service goes through the signed gateway, which
//! reports failures with these types and never retries.

use thiserror::Error;

/// Errors raised while computing a request signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The request URL has no host to sign.
    #[error("Request URL has no host: {0}")]
    MissingHost(String),

    /// The signing key could not be derived.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Errors raised by the signed gateway.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The outbound request could not be built.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The request could not be signed.
    #[error("Signing error: {0}")]
    SigningError(#[from] SigningError),

    /// The index service could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The index service answered with a non-2xx status.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl TransportError {
    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an unexpected-status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status, when the service answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
