//! Error types for the product search repository.

mod config_error;
mod index_error;
mod search_error;
mod transport_error;

pub use config_error::ConfigError;
pub use index_error::IndexError;
pub use search_error::SearchError;
pub use transport_error::{SigningError, TransportError};
