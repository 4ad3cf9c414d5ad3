//! Signed HTTP gateway to the index service.
//!
//! Outgoing requests pass through a signing stage before they reach the
//! [`HttpTransport`]. The transport is a trait so tests can record requests
//! instead of opening connections.

mod opensearch_transport;
mod signed_gateway;

pub use opensearch_transport::OpenSearchTransport;
pub use signed_gateway::{GatewayResponse, SignedGateway};

use async_trait::async_trait;
use url::Url;

use crate::errors::TransportError;

/// Methods the index service is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl From<HttpMethod> for opensearch::http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::Get,
            HttpMethod::Put => Self::Put,
            HttpMethod::Post => Self::Post,
            HttpMethod::Delete => Self::Delete,
            HttpMethod::Head => Self::Head,
        }
    }
}

/// A fully prepared outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Raw answer of the index service.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends prepared requests over the network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return whatever the service answered.
    ///
    /// Only failures to obtain an answer are errors; status handling is left
    /// to the caller.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
