//! Consumer module for the product search pipeline.
//!
//! Decodes batches delivered by the product table's change stream.

mod messages;
mod stream_decoder;

pub use messages::{StreamBatch, StreamImage, StreamRecord};
pub use stream_decoder::{StreamDecoder, DEFAULT_KEY_ATTRIBUTE};
