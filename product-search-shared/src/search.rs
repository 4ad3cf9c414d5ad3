//! Search query and result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum edit distance tolerated between a query term and a field token.
pub const DEFAULT_FUZZINESS: u32 = 2;

/// Maximum number of hits returned for a product search.
pub const DEFAULT_RESULT_LIMIT: usize = 20;

/// A field searched by a query, with its relevance multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBoost {
    pub name: String,
    pub boost: f32,
}

impl FieldBoost {
    pub fn new(name: impl Into<String>, boost: f32) -> Self {
        Self {
            name: name.into(),
            boost,
        }
    }

    /// Field reference in `name^boost` notation; unboosted fields are bare.
    pub fn spec(&self) -> String {
        if (self.boost - 1.0).abs() < f32::EPSILON {
            self.name.clone()
        } else {
            format!("{}^{}", self.name, self.boost)
        }
    }
}

/// Parameters for a fuzzy multi-field search.
///
/// Built fresh for every request and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// The free-text query entered by the caller.
    pub raw_text: String,
    /// Searched fields, in order.
    pub fields: Vec<FieldBoost>,
    /// Maximum edit distance per term.
    pub fuzziness: u32,
    /// Maximum number of hits.
    pub result_limit: usize,
    /// Tolerate field values that cannot be matched against the query type.
    pub lenient: bool,
}

impl SearchQuery {
    /// Product search over title, description and price, with title matches
    /// counting double.
    pub fn products(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            fields: vec![
                FieldBoost::new("title", 2.0),
                FieldBoost::new("description", 1.0),
                FieldBoost::new("price", 1.0),
            ],
            fuzziness: DEFAULT_FUZZINESS,
            result_limit: DEFAULT_RESULT_LIMIT,
            lenient: true,
        }
    }

    /// Replace the hit limit.
    pub fn with_limit(mut self, result_limit: usize) -> Self {
        self.result_limit = result_limit;
        self
    }

    /// Field references in `name^boost` notation.
    pub fn field_specs(&self) -> Vec<String> {
        self.fields.iter().map(FieldBoost::spec).collect()
    }

    /// Whether the query can be sent to the index.
    pub fn is_valid(&self) -> bool {
        !self.raw_text.trim().is_empty() && !self.fields.is_empty() && self.result_limit > 0
    }
}

/// A single ranked match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Document id in the index.
    pub entity_key: String,
    /// Relevance score assigned by the index.
    pub score: Option<f64>,
    /// The stored document.
    pub source: Value,
}

/// Ranked hits returned by the index service.
///
/// The `hits` envelope of the backend response is kept verbatim so it can be
/// handed back to callers without loss.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    envelope: Value,
    limit: usize,
}

impl SearchResult {
    /// Wrap a backend `hits` envelope.
    pub fn new(envelope: Value, limit: usize) -> Self {
        Self { envelope, limit }
    }

    /// An empty result.
    pub fn empty() -> Self {
        Self::new(
            serde_json::json!({ "total": { "value": 0, "relation": "eq" }, "max_score": null, "hits": [] }),
            0,
        )
    }

    /// The backend `hits` envelope, unmodified.
    pub fn envelope(&self) -> &Value {
        &self.envelope
    }

    /// Total matches reported by the backend.
    pub fn total(&self) -> Option<u64> {
        let total = self.envelope.get("total")?;
        total
            .get("value")
            .and_then(Value::as_u64)
            .or_else(|| total.as_u64())
    }

    /// Hits in rank order, bounded by the query's result limit.
    pub fn hits(&self) -> Vec<SearchHit> {
        self.envelope
            .get("hits")
            .and_then(Value::as_array)
            .map(|hits| {
                hits.iter()
                    .filter_map(Self::parse_hit)
                    .take(self.limit)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pretty-printed (two-space indent) JSON of the envelope.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.envelope)
    }

    fn parse_hit(hit: &Value) -> Option<SearchHit> {
        Some(SearchHit {
            entity_key: hit.get("_id")?.as_str()?.to_string(),
            score: hit.get("_score").and_then(Value::as_f64),
            source: hit.get("_source").cloned().unwrap_or(Value::Null),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_query_defaults() {
        let query = SearchQuery::products("wireless mouse");

        assert_eq!(query.field_specs(), vec!["title^2", "description", "price"]);
        assert_eq!(query.fuzziness, 2);
        assert_eq!(query.result_limit, 20);
        assert!(query.lenient);
        assert!(query.is_valid());
    }

    #[test]
    fn test_blank_query_is_invalid() {
        assert!(!SearchQuery::products("   ").is_valid());
        assert!(!SearchQuery::products("mouse").with_limit(0).is_valid());
    }

    #[test]
    fn test_hits_in_rank_order() {
        let result = SearchResult::new(
            json!({
                "total": { "value": 3, "relation": "eq" },
                "max_score": 4.2,
                "hits": [
                    { "_id": "1", "_score": 4.2, "_source": { "title": "Wireless Mouse" } },
                    { "_id": "2", "_score": 1.1, "_source": { "description": "wireless" } },
                    { "_score": 0.5 },
                    { "_id": "3", "_score": 0.9, "_source": {} }
                ]
            }),
            2,
        );

        let hits = result.hits();
        assert_eq!(result.total(), Some(3));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity_key, "1");
        assert_eq!(hits[0].score, Some(4.2));
        assert_eq!(hits[1].entity_key, "2");
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let result = SearchResult::new(json!({ "hits": [] }), 20);
        assert_eq!(result.to_pretty_json().unwrap(), "{\n  \"hits\": []\n}");
    }

    #[test]
    fn test_empty_result() {
        let result = SearchResult::empty();
        assert_eq!(result.total(), Some(0));
        assert!(result.hits().is_empty());
    }
}
