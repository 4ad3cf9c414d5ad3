//! Decoding of change stream deliveries into change batches.

use product_search_shared::{AttributeValue, ChangeBatch, ChangeEvent, EventKind, Record};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::consumer::messages::{StreamBatch, StreamRecord};
use crate::errors::PipelineError;

/// Key attribute of the product table.
pub const DEFAULT_KEY_ATTRIBUTE: &str = "productId";

const REMOVE_EVENT: &str = "REMOVE";

/// Turns stream deliveries into ordered [`ChangeBatch`]es.
#[derive(Debug, Clone)]
pub struct StreamDecoder {
    key_attribute: String,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_ATTRIBUTE)
    }
}

impl StreamDecoder {
    pub fn new(key_attribute: impl Into<String>) -> Self {
        Self {
            key_attribute: key_attribute.into(),
        }
    }

    /// Decode a delivery from its JSON text.
    pub fn decode_str(&self, input: &str) -> Result<ChangeBatch, PipelineError> {
        let value: Value = serde_json::from_str(input)?;
        self.decode(value)
    }

    /// Decode a delivery.
    ///
    /// Records keep their delivery order. A record whose key or image cannot
    /// be read still yields an event, without key or payload, so that it is
    /// reported as failed. Only a record without an event id fails the whole
    /// delivery, as it could not be reported individually.
    #[instrument(skip(self, value))]
    pub fn decode(&self, value: Value) -> Result<ChangeBatch, PipelineError> {
        let batch: StreamBatch = serde_json::from_value(value)?;

        let events = batch
            .records
            .into_iter()
            .enumerate()
            .map(|(position, record)| self.decode_record(position, record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(event_count = events.len(), "Decoded stream delivery");
        Ok(ChangeBatch::new(events))
    }

    fn decode_record(&self, position: usize, record: Value) -> Result<ChangeEvent, PipelineError> {
        let event_id = record
            .get("eventID")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::parse(format!("Record {} has no eventID", position))
            })?;

        let record: StreamRecord = match serde_json::from_value(record) {
            Ok(record) => record,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Malformed stream record");
                return Ok(ChangeEvent {
                    event_id,
                    kind: EventKind::Upsert,
                    entity_key: None,
                    payload: None,
                });
            }
        };

        let kind = match record.event_name.as_deref() {
            Some(REMOVE_EVENT) => EventKind::Delete,
            _ => EventKind::Upsert,
        };

        let image = record.dynamodb.unwrap_or_default();
        let entity_key = image.keys.as_ref().and_then(|keys| self.key_of(keys));
        let payload = match kind {
            EventKind::Upsert => image.new_image.and_then(|image| {
                serde_json::from_value::<Record>(image)
                    .map_err(|e| warn!(event_id = %event_id, error = %e, "Unreadable new image"))
                    .ok()
            }),
            EventKind::Delete => None,
        };

        Ok(ChangeEvent {
            event_id: record.event_id,
            kind,
            entity_key,
            payload,
        })
    }

    fn key_of(&self, keys: &Value) -> Option<String> {
        let attribute: AttributeValue =
            serde_json::from_value(keys.get(&self.key_attribute)?.clone()).ok()?;
        match attribute {
            AttributeValue::Number(n) => Some(n),
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn insert(id: &str, product_id: &str) -> Value {
        json!({
            "eventID": id,
            "eventName": "INSERT",
            "dynamodb": {
                "Keys": { "productId": { "N": product_id } },
                "NewImage": {
                    "productId": { "N": product_id },
                    "title": { "S": "Wireless Mouse" },
                    "price": { "N": "25" }
                }
            }
        })
    }

    #[test]
    fn test_decode_keeps_order_and_kinds() {
        let delivery = json!({
            "Records": [
                insert("e1", "42"),
                {
                    "eventID": "e2",
                    "eventName": "REMOVE",
                    "dynamodb": { "Keys": { "productId": { "N": "42" } } }
                },
                {
                    "eventID": "e3",
                    "eventName": "MODIFY",
                    "dynamodb": {
                        "Keys": { "productId": { "N": "7" } },
                        "NewImage": { "title": { "S": "Keyboard" } }
                    }
                }
            ]
        });

        let batch = StreamDecoder::default().decode(delivery).unwrap();

        assert_eq!(batch.event_ids().collect::<Vec<_>>(), vec!["e1", "e2", "e3"]);
        let events = batch.events();
        assert_eq!(events[0].kind, EventKind::Upsert);
        assert_eq!(events[0].key(), Some("42"));
        assert_eq!(
            events[0].payload.as_ref().unwrap().get("title"),
            Some(&AttributeValue::String("Wireless Mouse".to_string()))
        );
        assert_eq!(events[1].kind, EventKind::Delete);
        assert!(events[1].payload.is_none());
        assert_eq!(events[2].kind, EventKind::Upsert);
        assert_eq!(events[2].key(), Some("7"));
    }

    #[test]
    fn test_missing_key_still_yields_event() {
        let delivery = json!({
            "Records": [{
                "eventID": "e1",
                "eventName": "INSERT",
                "dynamodb": { "NewImage": { "title": { "S": "Orphan" } } }
            }]
        });

        let batch = StreamDecoder::default().decode(delivery).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.events()[0].key(), None);
        assert!(batch.events()[0].payload.is_some());
    }

    #[test]
    fn test_malformed_record_yields_event_without_key() {
        let delivery = json!({
            "Records": [
                { "eventID": "bad", "eventName": "INSERT", "dynamodb": "oops" },
                insert("good", "1")
            ]
        });

        let batch = StreamDecoder::default().decode(delivery).unwrap();

        assert_eq!(batch.event_ids().collect::<Vec<_>>(), vec!["bad", "good"]);
        assert_eq!(batch.events()[0].entity_key, None);
        assert_eq!(batch.events()[1].key(), Some("1"));
    }

    #[test]
    fn test_string_key_and_custom_attribute() {
        let delivery = json!({
            "Records": [{
                "eventID": "e1",
                "eventName": "REMOVE",
                "dynamodb": { "Keys": { "sku": { "S": "AB-12" } } }
            }]
        });

        let batch = StreamDecoder::new("sku").decode(delivery).unwrap();

        assert_eq!(batch.events()[0].key(), Some("AB-12"));
    }

    #[test]
    fn test_record_without_event_id_fails_delivery() {
        let delivery = json!({ "Records": [{ "eventName": "INSERT" }] });

        let err = StreamDecoder::default().decode(delivery).unwrap_err();

        assert!(matches!(err, PipelineError::ParseError(_)));
    }

    #[test]
    fn test_decode_str_rejects_invalid_json() {
        assert!(StreamDecoder::default().decode_str("not json").is_err());
        assert!(StreamDecoder::default()
            .decode_str(r#"{"Records": []}"#)
            .unwrap()
            .is_empty());
    }
}
