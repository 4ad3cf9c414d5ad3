//! Index mutator trait definition.

use async_trait::async_trait;

use crate::errors::IndexError;
use product_search_shared::IndexDocument;

/// Writes and removes single documents in the search index.
///
/// Both operations are idempotent: applying the same upsert twice leaves the
/// same document behind, and deleting an absent key succeeds. Redelivered
/// change events rely on this.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait IndexMutator: Send + Sync {
    /// Create or fully replace the document stored under `entity_key`.
    ///
    /// # Arguments
    ///
    /// * `entity_key` - Identity of the document
    /// * `document` - The complete document; absent fields are not kept
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was written
    /// * `Err(IndexError)` - If the request failed or the index rejected it
    async fn upsert(&self, entity_key: &str, document: &IndexDocument) -> Result<(), IndexError>;

    /// Remove the document stored under `entity_key`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted (or didn't exist)
    /// * `Err(IndexError)` - If the deletion fails
    async fn delete(&self, entity_key: &str) -> Result<(), IndexError>;
}
