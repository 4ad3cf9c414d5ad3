//! # Product Search Shared
//!
//! Types shared between the repository, the pipeline and the entry points:
//! change events coming off the product table stream, the documents written
//! to the search index, and the query/result types of the search endpoint.

mod document;
mod event;
mod outcome;
mod search;

pub use document::{FieldValue, IndexDocument};
pub use event::{AttributeValue, ChangeBatch, ChangeEvent, EventKind, Record};
pub use outcome::{BatchItemFailure, BatchOutcome, BatchResponse};
pub use search::{
    FieldBoost, SearchHit, SearchQuery, SearchResult, DEFAULT_FUZZINESS, DEFAULT_RESULT_LIMIT,
};
