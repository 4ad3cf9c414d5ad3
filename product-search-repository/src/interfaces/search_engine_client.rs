//! Search engine client trait definition.
//!
//! This module defines the abstract interface for query execution,
//! allowing for different backend implementations.

use async_trait::async_trait;

use crate::errors::SearchError;
use product_search_shared::{SearchQuery, SearchResult};

/// Executes ranked queries against the index.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Execute a search query against the index.
    ///
    /// # Arguments
    ///
    /// * `query` - Query text, searched fields with boosts, fuzziness and limit
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResult)` - The ranked hits as returned by the backend
    /// * `Err(SearchError)` - If the query is invalid or the search fails
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = SearchQuery::products("wireless mouse");
    /// let result = client.search(&query).await?;
    /// println!("Found {:?} results", result.total());
    /// ```
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError>;
}
