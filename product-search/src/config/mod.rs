//! Process wiring for the product search entry points.

mod dependencies;
mod lazy_client;

pub use dependencies::Dependencies;
pub use lazy_client::LazyClient;
