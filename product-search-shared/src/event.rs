//! Change events emitted by the product table stream.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Kind of mutation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Record was created or modified.
    Upsert,
    /// Record was removed.
    Delete,
}

/// A single typed attribute of a stored record.
///
/// The record store transmits attributes as single-entry maps keyed by a type
/// tag (`{"S": "..."}`, `{"N": "25"}`). Numbers keep their string form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub enum AttributeValue {
    /// `S` attribute.
    String(String),
    /// `N` attribute, kept verbatim.
    Number(String),
    /// `BOOL` attribute.
    Bool(bool),
    /// `NULL` attribute.
    Null,
    /// Any other attribute type (sets, lists, maps, binary).
    Unsupported(Value),
}

impl AttributeValue {
    /// The string payload of an `S` attribute.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The textual payload of an `N` attribute.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl From<BTreeMap<String, Value>> for AttributeValue {
    fn from(map: BTreeMap<String, Value>) -> Self {
        let mut entries = map.into_iter();
        let (tag, value) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (first, second) => {
                let rest: serde_json::Map<String, Value> =
                    first.into_iter().chain(second).chain(entries).collect();
                return Self::Unsupported(Value::Object(rest));
            }
        };

        match (tag.as_str(), value) {
            ("S", Value::String(s)) => Self::String(s),
            ("N", Value::String(n)) => Self::Number(n),
            ("BOOL", Value::Bool(b)) => Self::Bool(b),
            ("NULL", Value::Bool(true)) => Self::Null,
            (_, value) => {
                let mut single = serde_json::Map::new();
                single.insert(tag, value);
                Self::Unsupported(Value::Object(single))
            }
        }
    }
}

/// Attribute map of a stored record, as carried by an upsert event.
pub type Record = BTreeMap<String, AttributeValue>;

/// A single notified mutation of one record in the source store.
///
/// Events are never mutated after creation. A well-formed delete never carries
/// a payload and a well-formed upsert always does; malformed events are still
/// representable so they can be reported back as failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Identifier used for failure reporting.
    pub event_id: String,
    /// What happened to the record.
    pub kind: EventKind,
    /// Primary identity of the indexed document.
    pub entity_key: Option<String>,
    /// New image of the record (upserts only).
    pub payload: Option<Record>,
}

impl ChangeEvent {
    /// Create an upsert event.
    pub fn upsert(
        event_id: impl Into<String>,
        entity_key: impl Into<String>,
        payload: Record,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            kind: EventKind::Upsert,
            entity_key: Some(entity_key.into()),
            payload: Some(payload),
        }
    }

    /// Create a delete event.
    pub fn delete(event_id: impl Into<String>, entity_key: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            kind: EventKind::Delete,
            entity_key: Some(entity_key.into()),
            payload: None,
        }
    }

    /// The entity key, if present and not blank. The key is returned as
    /// stored, surrounding whitespace included.
    pub fn key(&self) -> Option<&str> {
        self.entity_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Ordered change events of one delivery attempt for one partition.
///
/// The order reflects the order mutations happened in the source store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch {
    events: Vec<ChangeEvent>,
}

impl ChangeBatch {
    /// Create a batch from events in source order.
    pub fn new(events: Vec<ChangeEvent>) -> Self {
        Self { events }
    }

    /// Events in source order.
    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Identifiers of every event in the batch.
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|event| event.event_id.as_str())
    }
}

impl From<Vec<ChangeEvent>> for ChangeBatch {
    fn from(events: Vec<ChangeEvent>) -> Self {
        Self::new(events)
    }
}
