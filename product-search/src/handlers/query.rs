//! Search endpoint handler.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use product_search_repository::{SearchEngineClient, SearchError};
use product_search_shared::{SearchQuery, SearchResult};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Request parameter carrying the query text.
pub const QUERY_PARAM: &str = "query";

const MISSING_QUERY: &str = "Missing Query";
const SEARCH_UNAVAILABLE: &str = "Search Unavailable";
const INTERNAL_ERROR: &str = "Internal Server Error";

/// Errors of the query path.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query text is absent or empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The index service could not answer.
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),
}

impl QueryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::SearchUnavailable(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::SearchUnavailable(_) => 503,
        }
    }
}

impl From<SearchError> for QueryError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidQuery(msg) => Self::Validation(msg),
            other => Self::SearchUnavailable(other.to_string()),
        }
    }
}

/// Response handed back to the HTTP front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::from([(
                "Access-Control-Allow-Origin".to_string(),
                "*".to_string(),
            )]),
            body: body.into(),
        }
    }
}

/// Runs product searches against the index.
#[derive(Clone)]
pub struct QueryHandler {
    client: Arc<dyn SearchEngineClient>,
}

impl QueryHandler {
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self { client }
    }

    /// Search products for `query_text`.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResult)` - Hits in the index's rank order
    /// * `Err(QueryError::Validation)` - The text is absent or blank
    /// * `Err(QueryError::SearchUnavailable)` - The index could not be reached
    ///   or rejected the search
    #[instrument(skip(self))]
    pub async fn handle(&self, query_text: Option<&str>) -> Result<SearchResult, QueryError> {
        let text = query_text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| QueryError::validation(MISSING_QUERY))?;

        let result = self.client.search(&SearchQuery::products(text)).await?;

        info!(total = ?result.total(), "Search completed");
        Ok(result)
    }

    /// Answer a search request given its query parameters.
    pub async fn handle_request(&self, params: &HashMap<String, String>) -> ApiResponse {
        let query_text = params.get(QUERY_PARAM).map(String::as_str);

        match self.handle(query_text).await {
            Ok(result) => match result.to_pretty_json() {
                Ok(body) => ApiResponse::new(200, body),
                Err(e) => {
                    error!(error = %e, "Failed to serialize search hits");
                    ApiResponse::new(500, INTERNAL_ERROR)
                }
            },
            Err(e @ QueryError::Validation(_)) => {
                warn!(error = %e, "Rejected search request");
                ApiResponse::new(e.status_code(), MISSING_QUERY)
            }
            Err(e @ QueryError::SearchUnavailable(_)) => {
                error!(error = %e, "Search failed");
                ApiResponse::new(e.status_code(), SEARCH_UNAVAILABLE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use product_search_repository::TransportError;
    use serde_json::json;
    use tokio::sync::Mutex;

    /// Search client answering with a fixed envelope.
    struct MockSearchClient {
        queries: Mutex<Vec<SearchQuery>>,
        envelope: serde_json::Value,
        unavailable: bool,
    }

    impl MockSearchClient {
        fn answering(envelope: serde_json::Value) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                envelope,
                unavailable: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::answering(json!({}))
            }
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
            self.queries.lock().await.push(query.clone());
            if self.unavailable {
                return Err(TransportError::connection("connection refused").into());
            }
            Ok(SearchResult::new(self.envelope.clone(), query.result_limit))
        }
    }

    fn envelope() -> serde_json::Value {
        json!({
            "total": { "value": 2, "relation": "eq" },
            "max_score": 3.1,
            "hits": [
                { "_id": "42", "_score": 3.1, "_source": { "title": "Wireless Mouse" } },
                { "_id": "7", "_score": 1.2, "_source": { "description": "A wireless keyboard" } }
            ]
        })
    }

    fn params(query: &str) -> HashMap<String, String> {
        HashMap::from([(QUERY_PARAM.to_string(), query.to_string())])
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let client = Arc::new(MockSearchClient::answering(envelope()));
        let handler = QueryHandler::new(client.clone());

        let absent = handler.handle_request(&HashMap::new()).await;
        let empty = handler.handle_request(&params("")).await;

        for response in [absent, empty] {
            assert_eq!(response.status_code, 400);
            assert_eq!(response.body, "Missing Query");
            assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        }
        assert!(client.queries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_is_validation_error() {
        let handler = QueryHandler::new(Arc::new(MockSearchClient::answering(envelope())));

        let err = handler.handle(Some("   ")).await.unwrap_err();

        assert!(matches!(err, QueryError::Validation(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_search_returns_pretty_hits() {
        let client = Arc::new(MockSearchClient::answering(envelope()));
        let handler = QueryHandler::new(client.clone());

        let response = handler.handle_request(&params("wireless mouse")).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            response.body,
            serde_json::to_string_pretty(&envelope()).unwrap()
        );
        assert!(response.body.contains("\n  \"hits\""));

        let queries = client.queries.lock().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].raw_text, "wireless mouse");
        assert_eq!(queries[0].field_specs(), vec!["title^2", "description", "price"]);
        assert_eq!(queries[0].fuzziness, 2);
        assert_eq!(queries[0].result_limit, 20);
        assert!(queries[0].lenient);
    }

    #[tokio::test]
    async fn test_hits_keep_rank_order() {
        let handler = QueryHandler::new(Arc::new(MockSearchClient::answering(envelope())));

        let result = handler.handle(Some("wireless")).await.unwrap();

        let keys: Vec<String> = result.hits().into_iter().map(|hit| hit.entity_key).collect();
        assert_eq!(keys, vec!["42", "7"]);
        assert_eq!(result.total(), Some(2));
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let handler = QueryHandler::new(Arc::new(MockSearchClient::unavailable()));

        let response = handler.handle_request(&params("mouse")).await;

        assert_eq!(response.status_code, 503);
        assert_eq!(response.body, "Search Unavailable");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_search_error_mapping() {
        let invalid: QueryError = SearchError::invalid_query("empty").into();
        let parse: QueryError = SearchError::parse("no hits").into();

        assert!(matches!(invalid, QueryError::Validation(_)));
        assert!(matches!(parse, QueryError::SearchUnavailable(_)));
    }

    #[test]
    fn test_response_serializes_for_http_front_end() {
        let response = ApiResponse::new(400, "Missing Query");

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(value["body"], "Missing Query");
    }
}
