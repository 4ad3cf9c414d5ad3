//! # Product Search Repository
//!
//! This crate provides everything that talks to the search index service:
//! request signing, the signed HTTP gateway, the index mutator used by the
//! stream pipeline and the query execution used by the search endpoint,
//! together with a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod interfaces;
pub mod opensearch;
pub mod signing;

pub use config::SearchConfig;
pub use errors::{ConfigError, IndexError, SearchError, SigningError, TransportError};
pub use gateway::{GatewayResponse, HttpMethod, HttpTransport, OpenSearchTransport, SignedGateway};
pub use interfaces::{IndexMutator, SearchEngineClient};
pub use opensearch::OpenSearchClient;
pub use signing::{Credentials, RequestSigner, SigV4Signer, SigningRequest};

#[cfg(test)]
pub(crate) mod testing;
