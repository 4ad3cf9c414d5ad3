//! Interface definitions for the index service.
//!
//! The pipeline only needs to mutate documents and the search endpoint only
//! needs to query them, so each side depends on its own trait. Both are
//! implemented by `OpenSearchClient` and can be swapped for mocks in tests.

mod index_mutator;
mod search_engine_client;

pub use index_mutator::IndexMutator;
pub use search_engine_client::SearchEngineClient;
