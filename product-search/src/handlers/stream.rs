//! Change stream handler.

use std::sync::Arc;

use product_search_pipeline::consumer::StreamDecoder;
use product_search_pipeline::BatchSynchronizer;
use product_search_repository::IndexMutator;
use product_search_shared::BatchResponse;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::AppError;

/// Applies stream deliveries to the index.
#[derive(Clone)]
pub struct StreamHandler {
    decoder: StreamDecoder,
    synchronizer: BatchSynchronizer,
}

impl StreamHandler {
    pub fn new(mutator: Arc<dyn IndexMutator>) -> Self {
        Self::with_decoder(mutator, StreamDecoder::default())
    }

    pub fn with_decoder(mutator: Arc<dyn IndexMutator>, decoder: StreamDecoder) -> Self {
        Self {
            decoder,
            synchronizer: BatchSynchronizer::new(mutator),
        }
    }

    /// Synchronize one delivery and report the events to redeliver.
    ///
    /// Rejected events are reported like any other failure; the stream
    /// runtime's retry limit and failure destination decide their fate.
    #[instrument(skip_all)]
    pub async fn handle(&self, delivery: Value) -> Result<BatchResponse, AppError> {
        let batch = self.decoder.decode(delivery)?;
        let outcome = self.synchronizer.process_batch(&batch).await;

        if !outcome.rejected_ids().is_empty() {
            warn!(
                rejected = ?outcome.rejected_ids(),
                "Malformed events reported for redelivery"
            );
        }

        Ok(outcome.to_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use product_search_repository::IndexError;
    use product_search_shared::IndexDocument;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockIndex {
        documents: Mutex<HashMap<String, IndexDocument>>,
    }

    #[async_trait]
    impl IndexMutator for MockIndex {
        async fn upsert(&self, entity_key: &str, document: &IndexDocument) -> Result<(), IndexError> {
            self.documents
                .lock()
                .await
                .insert(entity_key.to_string(), document.clone());
            Ok(())
        }

        async fn delete(&self, entity_key: &str) -> Result<(), IndexError> {
            self.documents.lock().await.remove(entity_key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delivery_reports_malformed_record() {
        let index = Arc::new(MockIndex::default());
        let handler = StreamHandler::new(index.clone());
        let delivery = json!({
            "Records": [
                {
                    "eventID": "e1",
                    "eventName": "INSERT",
                    "dynamodb": {
                        "Keys": { "productId": { "N": "42" } },
                        "NewImage": {
                            "productId": { "N": "42" },
                            "title": { "S": "Wireless Mouse" },
                            "price": { "N": "25" }
                        }
                    }
                },
                {
                    "eventID": "e2",
                    "eventName": "INSERT",
                    "dynamodb": { "NewImage": { "title": { "S": "No key" } } }
                },
                {
                    "eventID": "e3",
                    "eventName": "REMOVE",
                    "dynamodb": { "Keys": { "productId": { "N": "9" } } }
                }
            ]
        });

        let response = handler.handle(delivery).await.unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "batchItemFailures": [{ "itemIdentifier": "e2" }] })
        );
        let documents = index.documents.lock().await;
        assert_eq!(documents.len(), 1);
        assert!(documents.contains_key("42"));
    }

    #[tokio::test]
    async fn test_clean_delivery_reports_nothing() {
        let handler = StreamHandler::new(Arc::new(MockIndex::default()));

        let response = handler.handle(json!({ "Records": [] })).await.unwrap();

        assert!(response.batch_item_failures.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_delivery_is_error() {
        let handler = StreamHandler::new(Arc::new(MockIndex::default()));

        let err = handler.handle(json!({ "records": 1 })).await.unwrap_err();

        assert!(matches!(err, AppError::PipelineError(_)));
    }
}
