//! Request signing for the index service.
//!
//! A [`RequestSigner`] sees a read-only view of an outgoing request and
//! returns the headers to attach. It never owns the body, so signing cannot
//! alter or drop the payload that is eventually sent.

mod credentials;
mod sigv4;

pub use credentials::Credentials;
pub use sigv4::SigV4Signer;

use chrono::{DateTime, Utc};
use url::Url;

use crate::errors::SigningError;
use crate::gateway::HttpMethod;

/// Read-only view of a request about to be signed.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a Url,
    /// Headers the caller set, excluding `content-length`.
    pub headers: &'a [(String, String)],
    /// Exact bytes that will be transmitted.
    pub body: &'a [u8],
}

/// Computes authentication headers for outgoing requests.
///
/// Implementations hold the signing identity; it is injected at construction
/// and never passed per call.
pub trait RequestSigner: Send + Sync {
    /// Headers to attach to `request` when sent at `timestamp`.
    ///
    /// For a fixed request, timestamp and identity the result is
    /// deterministic.
    fn sign(
        &self,
        request: &SigningRequest<'_>,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, SigningError>;
}
