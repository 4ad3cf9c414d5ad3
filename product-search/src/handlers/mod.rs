//! Invocation handlers.

mod query;
mod stream;

pub use query::{ApiResponse, QueryError, QueryHandler, QUERY_PARAM};
pub use stream::StreamHandler;
