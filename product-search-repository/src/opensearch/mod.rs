//! OpenSearch implementation of the index interfaces.
//!
//! This module provides a concrete implementation of `IndexMutator` and
//! `SearchEngineClient` that talks to OpenSearch through the signed gateway.

mod client;
mod queries;

pub use client::OpenSearchClient;
pub use queries::build_search_query;
