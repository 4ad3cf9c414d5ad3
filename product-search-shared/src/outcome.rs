//! Result of synchronizing one change batch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Event identifiers that failed processing and must be redelivered.
///
/// An empty outcome signals full success. Rejected events are the subset that
/// failed validation; redelivering them cannot succeed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    failed: BTreeSet<String>,
    rejected: BTreeSet<String>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event whose index call failed.
    pub fn record_failure(&mut self, event_id: impl Into<String>) {
        self.failed.insert(event_id.into());
    }

    /// Record an event that was malformed and never reached the index.
    pub fn record_rejection(&mut self, event_id: impl Into<String>) {
        let event_id = event_id.into();
        self.rejected.insert(event_id.clone());
        self.failed.insert(event_id);
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.failed.contains(event_id)
    }

    /// Every failed event id, rejected ones included.
    pub fn failed_ids(&self) -> &BTreeSet<String> {
        &self.failed
    }

    /// Failed event ids that were rejected by validation.
    pub fn rejected_ids(&self) -> &BTreeSet<String> {
        &self.rejected
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Shape the outcome the way the stream runtime expects it back.
    pub fn to_response(&self) -> BatchResponse {
        BatchResponse {
            batch_item_failures: self
                .failed
                .iter()
                .map(|id| BatchItemFailure {
                    item_identifier: id.clone(),
                })
                .collect(),
        }
    }
}

/// Partial batch response returned to the stream runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_outcome_is_success() {
        let outcome = BatchOutcome::new();
        assert!(outcome.is_success());
        assert_eq!(
            serde_json::to_value(outcome.to_response()).unwrap(),
            json!({ "batchItemFailures": [] })
        );
    }

    #[test]
    fn test_rejection_counts_as_failure() {
        let mut outcome = BatchOutcome::new();
        outcome.record_failure("e2");
        outcome.record_rejection("e1");
        outcome.record_failure("e2");

        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_count(), 2);
        assert!(outcome.contains("e1"));
        assert_eq!(outcome.rejected_ids().len(), 1);
        assert_eq!(
            serde_json::to_value(outcome.to_response()).unwrap(),
            json!({
                "batchItemFailures": [
                    { "itemIdentifier": "e1" },
                    { "itemIdentifier": "e2" }
                ]
            })
        );
    }
}
