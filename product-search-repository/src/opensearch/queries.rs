//! OpenSearch query builders.

use serde_json::{json, Value};

use product_search_shared::SearchQuery;

/// Build an OpenSearch request body from a SearchQuery.
///
/// A single `multi_match` over the query's fields:
/// - per-field boosts in `field^boost` notation
/// - fixed edit-distance fuzziness for typo tolerance
/// - `lenient` so numeric fields such as price don't fail text queries
/// - `size` capped at the query's result limit
pub fn build_search_query(query: &SearchQuery) -> Value {
    json!({
        "size": query.result_limit,
        "query": build_multi_match(query)
    })
}

fn build_multi_match(query: &SearchQuery) -> Value {
    json!({
        "multi_match": {
            "query": query.raw_text,
            "fields": query.field_specs(),
            "lenient": query.lenient,
            "fuzziness": query.fuzziness
        }
    })
}
