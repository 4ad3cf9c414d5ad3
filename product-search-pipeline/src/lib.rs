//! # Product Search Pipeline
//!
//! This crate provides the pipeline components that keep the product index
//! in step with the product table's change stream.
//!
//! ## Architecture
//!
//! The pipeline follows the Consumer-Processor-Synchronizer pattern:
//!
//! 1. **Consumer**: Decodes a delivered stream batch into change events
//! 2. **Processor**: Validates events and projects records into documents
//! 3. **Synchronizer**: Applies each event to the index in order and reports
//!    the events that must be redelivered

pub mod consumer;
pub mod errors;
pub mod processor;
pub mod synchronizer;

pub use errors::PipelineError;
pub use synchronizer::{BatchState, BatchSynchronizer};
