//! Wire shape of a change stream delivery.

use serde::Deserialize;
use serde_json::Value;

/// One delivery of the change stream.
///
/// Records are kept as raw JSON so that one malformed record does not fail
/// the decoding of its neighbours.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamBatch {
    #[serde(rename = "Records")]
    pub records: Vec<Value>,
}

/// A single stream record.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub dynamodb: Option<StreamImage>,
}

/// Key and image section of a stream record.
///
/// Both maps stay untyped here and are decoded attribute by attribute.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamImage {
    #[serde(default)]
    pub keys: Option<Value>,
    #[serde(default)]
    pub new_image: Option<Value>,
}
