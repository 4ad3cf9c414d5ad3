//! The signed gateway.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::TransportError;
use crate::gateway::{HttpMethod, HttpRequest, HttpTransport};
use crate::signing::{RequestSigner, SigningRequest};

/// Successful answer of the index service.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends signed requests to a single index service endpoint.
///
/// Holds only configuration: the endpoint, the signer and the transport.
/// It is safe to share across concurrent invocations.
#[derive(Clone)]
pub struct SignedGateway {
    endpoint: Url,
    signer: Arc<dyn RequestSigner>,
    transport: Arc<dyn HttpTransport>,
}

impl SignedGateway {
    pub fn new(
        endpoint: Url,
        signer: Arc<dyn RequestSigner>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            endpoint,
            signer,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send a signed request and return the answer.
    ///
    /// `path` is relative to the endpoint and may carry a query string. Any
    /// `content-length` header is dropped before signing; the transport
    /// recomputes it from the body, which is forwarded exactly as given.
    ///
    /// # Returns
    ///
    /// * `Ok(GatewayResponse)` - The service answered with a 2xx status
    /// * `Err(TransportError)` - Signing or the network call failed, or the
    ///   service answered with any other status
    #[instrument(skip(self, headers, body), fields(body_len = body.as_ref().map_or(0, Vec::len)))]
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<GatewayResponse, TransportError> {
        let url = self.resolve(path)?;

        let mut request_headers: Vec<(String, String)> = headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("content-length"))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let signature_headers = self.signer.sign(
            &SigningRequest {
                method,
                url: &url,
                headers: &request_headers,
                body: body.as_deref().unwrap_or_default(),
            },
            Utc::now(),
        )?;
        request_headers.extend(signature_headers);

        let response = self
            .transport
            .execute(HttpRequest {
                method,
                url,
                headers: request_headers,
                body,
            })
            .await?;

        if !(200..300).contains(&response.status) {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = response.status, body = %body, "Index service rejected request");
            return Err(TransportError::status(response.status, body));
        }

        debug!(status = response.status, "Request succeeded");
        Ok(GatewayResponse {
            status: response.status,
            body: response.body,
        })
    }

    /// Resolve a request path against the endpoint, keeping any base path.
    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        if !path.starts_with('/') {
            return Err(TransportError::request(format!(
                "Path must be absolute: {}",
                path
            )));
        }

        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.endpoint.clone();
        let base = self.endpoint.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", base, path));
        url.set_query(query);
        Ok(url)
    }
}
