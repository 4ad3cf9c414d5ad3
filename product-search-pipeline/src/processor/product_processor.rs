//! Product record projection.

use product_search_shared::{
    AttributeValue, ChangeEvent, EventKind, FieldValue, IndexDocument, Record,
};
use tracing::debug;

use crate::errors::PipelineError;

/// Attribute type a projected field is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    Number,
    Text,
}

/// Attributes copied from a product record into its document.
const PRODUCT_FIELDS: &[(&str, AttributeKind)] = &[
    ("productId", AttributeKind::Number),
    ("price", AttributeKind::Number),
    ("title", AttributeKind::Text),
    ("description", AttributeKind::Text),
];

/// Index mutation derived from a valid change event.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Upsert {
        entity_key: String,
        document: IndexDocument,
    },
    Delete {
        entity_key: String,
    },
}

impl Mutation {
    pub fn entity_key(&self) -> &str {
        match self {
            Self::Upsert { entity_key, .. } | Self::Delete { entity_key } => entity_key,
        }
    }
}

/// Turns change events into index mutations.
#[derive(Debug, Clone, Default)]
pub struct ProductProcessor;

impl ProductProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Validate an event and derive the mutation it calls for.
    ///
    /// # Returns
    ///
    /// * `Ok(Mutation)` - The event is well formed
    /// * `Err(PipelineError::ValidationError)` - The key is missing or empty,
    ///   or an upsert carries no payload
    pub fn prepare(&self, event: &ChangeEvent) -> Result<Mutation, PipelineError> {
        let entity_key = event
            .key()
            .ok_or_else(|| {
                PipelineError::validation(format!("Event {} has no entity key", event.event_id))
            })?
            .to_string();

        match event.kind {
            EventKind::Delete => Ok(Mutation::Delete { entity_key }),
            EventKind::Upsert => {
                let payload = event.payload.as_ref().ok_or_else(|| {
                    PipelineError::validation(format!(
                        "Upsert event {} has no payload",
                        event.event_id
                    ))
                })?;
                let document = self.project(&entity_key, payload);
                Ok(Mutation::Upsert {
                    entity_key,
                    document,
                })
            }
        }
    }

    /// Project a product record into its index document.
    ///
    /// Fields missing from the record, or stored with another type, are left
    /// out. Numbers keep their textual form.
    pub fn project(&self, entity_key: &str, record: &Record) -> IndexDocument {
        let document = PRODUCT_FIELDS
            .iter()
            .fold(IndexDocument::new(entity_key), |document, (name, kind)| {
                document.with_optional_field(*name, record.get(*name).and_then(|v| read(v, *kind)))
            });

        debug!(
            entity_key = %entity_key,
            field_count = document.fields.len(),
            "Projected product record"
        );
        document
    }
}

fn read(value: &AttributeValue, kind: AttributeKind) -> Option<FieldValue> {
    let text = match kind {
        AttributeKind::Number => value.as_number(),
        AttributeKind::Text => value.as_string(),
    };
    text.map(FieldValue::from)
}
