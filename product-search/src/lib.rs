//! # Product Search
//!
//! Entry points of the product search index: the stream handler that keeps
//! the index in step with the product table, and the query handler behind
//! the search endpoint.
//!
//! Both share one lazily created, signed OpenSearch client per process.

pub mod config;
pub mod handlers;

pub use config::{Dependencies, LazyClient};
pub use handlers::{ApiResponse, QueryError, QueryHandler, StreamHandler};

use thiserror::Error;

/// Errors that can occur during initialization or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] product_search_repository::ConfigError),

    /// The search client could not be created.
    #[error("Client error: {0}")]
    ClientError(#[from] product_search_repository::TransportError),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] product_search_pipeline::PipelineError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
