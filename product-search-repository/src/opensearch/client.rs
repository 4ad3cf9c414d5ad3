//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `IndexMutator` and
//! `SearchEngineClient` on top of the signed gateway.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::SearchConfig;
use crate::errors::{IndexError, SearchError, TransportError};
use crate::gateway::{HttpMethod, OpenSearchTransport, SignedGateway};
use crate::interfaces::{IndexMutator, SearchEngineClient};
use crate::opensearch::queries::build_search_query;
use crate::signing::{Credentials, SigV4Signer};
use product_search_shared::{IndexDocument, SearchQuery, SearchResult};

const JSON_HEADERS: &[(&str, &str)] = &[("content-type", "application/json")];

/// OpenSearch client for a single index.
///
/// # Example
///
/// ```ignore
/// let config = SearchConfig::from_env()?;
/// let client = OpenSearchClient::from_config(&config, Credentials::load().await?)?;
///
/// let document = IndexDocument::new("42").with_field("title", "Wireless Mouse");
/// client.upsert("42", &document).await?;
/// ```
#[derive(Clone)]
pub struct OpenSearchClient {
    gateway: SignedGateway,
    index_name: String,
}

impl OpenSearchClient {
    /// Create a client that sends through an existing gateway.
    pub fn new(gateway: SignedGateway, index_name: impl Into<String>) -> Self {
        Self {
            gateway,
            index_name: index_name.into(),
        }
    }

    /// Create a client that signs with `credentials` and sends through an
    /// `opensearch` connection to the configured endpoint.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, index, region and signing service
    /// * `credentials` - The identity the process runs under
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(TransportError)` - If the HTTP client cannot be built
    pub fn from_config(
        config: &SearchConfig,
        credentials: Credentials,
    ) -> Result<Self, TransportError> {
        let signer = SigV4Signer::new(
            credentials,
            config.region.clone(),
            config.service_identifier.clone(),
        );
        let transport = OpenSearchTransport::new(&config.endpoint)?;
        let gateway = SignedGateway::new(
            config.endpoint.clone(),
            Arc::new(signer),
            Arc::new(transport),
        );

        info!(
            endpoint = %config.endpoint,
            index = %config.index_name,
            region = %config.region,
            service = %config.service_identifier,
            "Created OpenSearch client"
        );

        Ok(Self::new(gateway, config.index_name.clone()))
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Path of the document stored under `entity_key`.
    fn document_path(&self, entity_key: &str) -> String {
        format!(
            "/{}/_doc/{}",
            urlencoding::encode(&self.index_name),
            urlencoding::encode(entity_key)
        )
    }

    fn search_path(&self) -> String {
        format!("/{}/_search", urlencoding::encode(&self.index_name))
    }

    fn require_key(entity_key: &str) -> Result<(), IndexError> {
        if entity_key.trim().is_empty() {
            return Err(IndexError::validation("entity_key is required"));
        }
        Ok(())
    }

    /// The `result` field of a document API response, for logging.
    fn result_of(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Value>(body)
            .ok()?
            .get("result")?
            .as_str()
            .map(str::to_string)
    }
}

impl fmt::Debug for OpenSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenSearchClient")
            .field("endpoint", &self.gateway.endpoint().as_str())
            .field("index_name", &self.index_name)
            .finish()
    }
}

#[async_trait]
impl IndexMutator for OpenSearchClient {
    /// Index the full document under its key, replacing any earlier version.
    #[instrument(skip(self, document), fields(index = %self.index_name))]
    async fn upsert(&self, entity_key: &str, document: &IndexDocument) -> Result<(), IndexError> {
        Self::require_key(entity_key)?;

        let body =
            serde_json::to_vec(document).map_err(|e| IndexError::serialization(e.to_string()))?;

        let response = self
            .gateway
            .send(
                HttpMethod::Put,
                &self.document_path(entity_key),
                JSON_HEADERS,
                Some(body),
            )
            .await
            .map_err(|e| IndexError::from_transport(entity_key, e))?;

        debug!(
            entity_key = %entity_key,
            result = ?Self::result_of(&response.body),
            "Indexed document"
        );
        Ok(())
    }

    /// Delete the document under its key. A 404 means it is already gone.
    #[instrument(skip(self), fields(index = %self.index_name))]
    async fn delete(&self, entity_key: &str) -> Result<(), IndexError> {
        Self::require_key(entity_key)?;

        match self
            .gateway
            .send(HttpMethod::Delete, &self.document_path(entity_key), &[], None)
            .await
        {
            Ok(response) => {
                debug!(
                    entity_key = %entity_key,
                    result = ?Self::result_of(&response.body),
                    "Deleted document"
                );
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(entity_key = %entity_key, "Document already absent");
                Ok(())
            }
            Err(e) => Err(IndexError::from_transport(entity_key, e)),
        }
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self, query), fields(index = %self.index_name, query = %query.raw_text))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        if !query.is_valid() {
            return Err(SearchError::invalid_query("query text must not be empty"));
        }

        let body = serde_json::to_vec(&build_search_query(query))
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let response = self
            .gateway
            .send(HttpMethod::Post, &self.search_path(), JSON_HEADERS, Some(body))
            .await?;

        let parsed: Value = response
            .json()
            .map_err(|e| SearchError::parse(format!("Invalid search response: {}", e)))?;
        let hits = parsed
            .get("hits")
            .cloned()
            .ok_or_else(|| SearchError::parse("Search response has no hits"))?;

        let result = SearchResult::new(hits, query.result_limit);
        debug!(total = ?result.total(), "Search completed");
        Ok(result)
    }
}
