//! Process-wide, lazily initialized client.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;

/// A client created on first use and shared read-only afterwards.
///
/// Concurrent first callers wait on a single initialization. A failed
/// initialization leaves the cell empty so that a later call can retry.
#[derive(Debug)]
pub struct LazyClient<T> {
    cell: OnceCell<Arc<T>>,
}

impl<T> Default for LazyClient<T> {
    fn default() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }
}

impl<T> LazyClient<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell that is already initialized.
    pub fn ready(client: Arc<T>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(client)),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the client, creating it with `init` if this is the first use.
    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell
            .get_or_try_init(|| async { init().await.map(Arc::new) })
            .await
            .cloned()
    }
}
