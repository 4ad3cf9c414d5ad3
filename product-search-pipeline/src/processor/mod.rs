//! Processor module for the product search pipeline.
//!
//! Validates change events and projects product records into documents.

mod product_processor;

pub use product_processor::{Mutation, ProductProcessor};
