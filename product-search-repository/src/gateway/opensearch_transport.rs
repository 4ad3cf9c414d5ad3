//! Transport backed by the OpenSearch client.

use async_trait::async_trait;
use opensearch::http::headers::{HeaderMap, HeaderName, HeaderValue};
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::OpenSearch;
use tracing::debug;
use url::Url;

use crate::errors::TransportError;
use crate::gateway::{HttpRequest, HttpResponse, HttpTransport};

/// Sends already signed requests through an [`OpenSearch`] connection.
///
/// The connection is rooted at the endpoint's origin, so the request path
/// reaches the service exactly as it was signed.
#[derive(Clone)]
pub struct OpenSearchTransport {
    client: OpenSearch,
}

impl OpenSearchTransport {
    pub fn new(endpoint: &Url) -> Result<Self, TransportError> {
        let origin = Url::parse(&endpoint.origin().ascii_serialization())
            .map_err(|e| TransportError::request(format!("Invalid endpoint origin: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(origin);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| TransportError::request(e.to_string()))?;

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

/// Path and query of `url`, relative to its origin.
pub(crate) fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

pub(crate) fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::request(format!("Invalid header {}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::request(format!("Invalid value for {}: {}", name, e)))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl HttpTransport for OpenSearchTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = header_map(&request.headers)?;
        let path = path_and_query(&request.url);

        let response = self
            .client
            .send(
                request.method.into(),
                &path,
                headers,
                None::<&()>,
                request.body,
                None,
            )
            .await
            .map_err(|e| TransportError::connection(e.to_string()))?;

        let status = response.status_code().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::connection(e.to_string()))?;

        debug!(
            method = request.method.as_str(),
            path = %path,
            status = status,
            "Index service responded"
        );

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
