//! Documents written to the search index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar value stored in an index document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single logical document in the search index.
///
/// Once written, the index service owns the document; the pipeline keeps no
/// durable copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Identity of the document, shared with the source record.
    #[serde(skip)]
    pub entity_key: String,
    /// Field name to scalar value. Absent fields are simply not present.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl IndexDocument {
    /// Create an empty document for the given key.
    pub fn new(entity_key: impl Into<String>) -> Self {
        Self {
            entity_key: entity_key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field, replacing any previous value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field only when a value is present.
    pub fn with_optional_field(
        mut self,
        name: impl Into<String>,
        value: Option<impl Into<FieldValue>>,
    ) -> Self {
        if let Some(value) = value {
            self.fields.insert(name.into(), value.into());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
