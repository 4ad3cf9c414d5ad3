//! Batch synchronizer.
//!
//! Processes one delivered batch event by event, in source order, and
//! collects the identifiers of events that did not reach the index.

use std::sync::Arc;

use product_search_repository::IndexMutator;
use product_search_shared::{BatchOutcome, ChangeBatch, ChangeEvent};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::processor::{Mutation, ProductProcessor};

/// Lifecycle of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Received,
    Processing,
    /// Every event was applied.
    Complete,
    /// At least one event must be redelivered.
    PartialFailure,
}

impl BatchState {
    /// Terminal state for a finished batch.
    pub fn of(outcome: &BatchOutcome) -> Self {
        if outcome.is_success() {
            Self::Complete
        } else {
            Self::PartialFailure
        }
    }
}

/// Keeps the index in step with a stream of change batches.
///
/// Holds only the index handle; no state survives between batches.
#[derive(Clone)]
pub struct BatchSynchronizer {
    mutator: Arc<dyn IndexMutator>,
    processor: ProductProcessor,
}

impl BatchSynchronizer {
    pub fn new(mutator: Arc<dyn IndexMutator>) -> Self {
        Self {
            mutator,
            processor: ProductProcessor::new(),
        }
    }

    /// Apply every event of the batch and report the ones that failed.
    ///
    /// Events are applied strictly one after another, so a later event for a
    /// key always lands after an earlier one. A failing event does not stop
    /// the rest of the batch. Malformed events never reach the index and
    /// are reported both as failed and as rejected.
    #[instrument(skip(self, batch), fields(event_count = batch.len()))]
    pub async fn process_batch(&self, batch: &ChangeBatch) -> BatchOutcome {
        let mut state = BatchState::Received;
        debug!(state = ?state, "Batch received");

        let mut outcome = BatchOutcome::new();
        state = BatchState::Processing;
        debug!(state = ?state, "Processing batch");

        for event in batch.events() {
            match self.apply(event).await {
                Ok(()) => {
                    debug!(event_id = %event.event_id, "Event applied");
                }
                Err(e) if e.is_validation() => {
                    warn!(event_id = %event.event_id, error = %e, "Rejected malformed event");
                    outcome.record_rejection(event.event_id.as_str());
                }
                Err(e) => {
                    error!(event_id = %event.event_id, error = %e, "Failed to apply event");
                    outcome.record_failure(event.event_id.as_str());
                }
            }
        }

        state = BatchState::of(&outcome);
        info!(
            state = ?state,
            failed = outcome.failure_count(),
            rejected = outcome.rejected_ids().len(),
            "Batch processed"
        );
        outcome
    }

    async fn apply(&self, event: &ChangeEvent) -> Result<(), PipelineError> {
        match self.processor.prepare(event)? {
            Mutation::Upsert {
                entity_key,
                document,
            } => self.mutator.upsert(&entity_key, &document).await?,
            Mutation::Delete { entity_key } => self.mutator.delete(&entity_key).await?,
        }
        Ok(())
    }
}
