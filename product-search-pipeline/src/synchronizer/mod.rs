//! Synchronizer module for the product search pipeline.
//!
//! Applies change batches to the index and reports partial failures.

mod batch_synchronizer;

pub use batch_synchronizer::{BatchState, BatchSynchronizer};
