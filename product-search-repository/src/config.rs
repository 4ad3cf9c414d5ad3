//! Configuration for reaching the search index service.

use std::env;

use url::Url;

use crate::errors::ConfigError;

/// Search service base URL (collection or domain endpoint).
pub const ENDPOINT_VAR: &str = "OPENSEARCH_ENDPOINT";

/// Logical index the products are written to and searched in.
pub const INDEX_VAR: &str = "OPENSEARCH_INDEX";

/// Region used in request signatures.
pub const REGION_VAR: &str = "AWS_REGION";

/// Service identifier used in request signatures.
pub const SERVICE_VAR: &str = "OPENSEARCH_SERVICE";

/// Signing service for OpenSearch Serverless collections.
pub const DEFAULT_SERVICE_IDENTIFIER: &str = "aoss";

/// Where the index lives and how requests to it are signed.
///
/// Established once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Search service base URL.
    pub endpoint: Url,
    /// Logical index identifier.
    pub index_name: String,
    /// Signing region.
    pub region: String,
    /// Signing service identifier.
    pub service_identifier: String,
}

impl SearchConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_ENDPOINT`: search service URL (required)
    /// - `OPENSEARCH_INDEX`: index name (required)
    /// - `AWS_REGION`: signing region (required)
    /// - `OPENSEARCH_SERVICE`: signing service (default: aoss)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = required(&lookup, ENDPOINT_VAR)?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| ConfigError::invalid(ENDPOINT_VAR, e.to_string()))?;
        if endpoint.host_str().is_none() {
            return Err(ConfigError::invalid(ENDPOINT_VAR, "endpoint has no host"));
        }

        let service_identifier = match lookup(SERVICE_VAR) {
            None => DEFAULT_SERVICE_IDENTIFIER.to_string(),
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::missing(SERVICE_VAR));
            }
            Some(value) => value.trim().to_string(),
        };

        Ok(Self {
            endpoint,
            index_name: required(&lookup, INDEX_VAR)?,
            region: required(&lookup, REGION_VAR)?,
            service_identifier,
        })
    }
}

/// Fetch a setting that must be present and non-empty.
fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::missing(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENDPOINT_VAR, "https://abc123.us-east-1.aoss.amazonaws.com"),
            (INDEX_VAR, "product-index"),
            (REGION_VAR, "us-east-1"),
        ]
    }

    #[test]
    fn test_complete_config() {
        let config = SearchConfig::from_lookup(lookup(&complete())).unwrap();

        assert_eq!(
            config.endpoint.host_str(),
            Some("abc123.us-east-1.aoss.amazonaws.com")
        );
        assert_eq!(config.index_name, "product-index");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.service_identifier, "aoss");
    }

    #[test]
    fn test_service_override() {
        let mut pairs = complete();
        pairs.push((SERVICE_VAR, "es"));

        let config = SearchConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.service_identifier, "es");
    }

    #[test]
    fn test_missing_values() {
        for key in [ENDPOINT_VAR, INDEX_VAR, REGION_VAR] {
            let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != key).collect();
            let err = SearchConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::missing(key));
        }
    }

    #[test]
    fn test_empty_values_are_missing() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != INDEX_VAR);
        pairs.push((INDEX_VAR, "  "));
        assert_eq!(
            SearchConfig::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::missing(INDEX_VAR)
        );

        let mut pairs = complete();
        pairs.push((SERVICE_VAR, ""));
        assert_eq!(
            SearchConfig::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::missing(SERVICE_VAR)
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut pairs = complete();
        pairs.retain(|(k, _)| *k != ENDPOINT_VAR);
        pairs.push((ENDPOINT_VAR, "not a url"));

        let err = SearchConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
