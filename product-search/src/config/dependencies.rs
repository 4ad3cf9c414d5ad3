//! Dependency initialization and wiring for the product search entry points.

use std::future::Future;
use std::sync::Arc;

use product_search_repository::{ConfigError, Credentials, OpenSearchClient, SearchConfig};
use tracing::info;

use crate::config::LazyClient;
use crate::handlers::{QueryHandler, StreamHandler};
use crate::AppError;

/// Process-wide state shared by every invocation.
///
/// The configuration is read once at startup. The signed client is created
/// on first use and reused read-only afterwards.
pub struct Dependencies {
    config: SearchConfig,
    client: LazyClient<OpenSearchClient>,
}

impl Dependencies {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            client: LazyClient::new(),
        }
    }

    /// Initialize from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_ENDPOINT`: Collection endpoint URL (required)
    /// - `OPENSEARCH_INDEX`: Index name (required)
    /// - `AWS_REGION`: Signing region (required)
    /// - `OPENSEARCH_SERVICE`: Signing service identifier (default: aoss)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Configuration is complete
    /// * `Err(AppError)` - A required value is missing or invalid
    pub fn from_env() -> Result<Self, AppError> {
        let config = SearchConfig::from_env()?;

        info!(
            endpoint = %config.endpoint,
            index = %config.index_name,
            region = %config.region,
            service = %config.service_identifier,
            "Loaded search configuration"
        );

        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The shared client, created from the ambient identity on first use.
    pub async fn client(&self) -> Result<Arc<OpenSearchClient>, AppError> {
        self.client_with(Credentials::load).await
    }

    /// The shared client, created with credentials resolved by `credentials`
    /// on first use.
    pub async fn client_with<F, Fut>(&self, credentials: F) -> Result<Arc<OpenSearchClient>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Credentials, ConfigError>>,
    {
        self.client
            .get_or_try_init(|| async move {
                let credentials = credentials().await?;
                let client = OpenSearchClient::from_config(&self.config, credentials)?;
                info!("Search client initialized");
                Ok::<_, AppError>(client)
            })
            .await
    }

    pub async fn query_handler(&self) -> Result<QueryHandler, AppError> {
        Ok(QueryHandler::new(self.client().await?))
    }

    pub async fn stream_handler(&self) -> Result<StreamHandler, AppError> {
        Ok(StreamHandler::new(self.client().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::from_lookup(|key: &str| match key {
            "OPENSEARCH_ENDPOINT" => Some("https://abc123.us-east-1.aoss.amazonaws.com".to_string()),
            "OPENSEARCH_INDEX" => Some("product-index".to_string()),
            "AWS_REGION" => Some("us-east-1".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_client_init() {
        let deps = Dependencies::new(config());

        let result = deps
            .client_with(|| async { Err(ConfigError::missing("AWS credentials provider")) })
            .await;

        assert!(matches!(result, Err(AppError::ConfigError(_))));
        assert!(format!("{:?}", result).contains("AWS credentials provider"));
    }

    #[tokio::test]
    async fn test_client_is_created_once() {
        let deps = Dependencies::new(config());

        let first = deps
            .client_with(|| async { Ok(Credentials::new("AKID", "secret", None)) })
            .await
            .unwrap();
        let second = deps
            .client_with(|| async { Err(ConfigError::missing("AWS credentials provider")) })
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.index_name(), "product-index");
        assert_eq!(deps.config().service_identifier, "aoss");
    }
}
