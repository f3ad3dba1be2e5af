//! The store seam and the raw document shapes it returns

use crate::Result;
use async_trait::async_trait;
use kgraph_core::ObjectType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored document as returned by a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDoc {
    #[serde(rename = "_id")]
    pub id: String,

    /// Carries a `type` discriminator and a payload keyed by that type
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl RawDoc {
    pub fn new(id: impl Into<String>, source: Value) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }

    /// The `type` field of the document body
    pub fn declared_type(&self) -> Option<&str> {
        self.source.get("type").and_then(Value::as_str)
    }

    /// The type-namespaced payload (`_source.<type>`)
    pub fn payload(&self, object_type: ObjectType) -> Option<&Value> {
        self.source.get(object_type.as_str())
    }
}

/// One page of a type-filtered search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSearchResult {
    /// Total number of matching documents, which may exceed `hits.len()`
    pub total: u64,
    pub hits: Vec<RawDoc>,
}

/// One element of a multi-get response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkDoc {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub found: bool,

    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

impl BulkDoc {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            found: false,
            source: None,
        }
    }
}

/// Queries against the saved-object index
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetch documents of one type, at most `size_limit` of them
    async fn query_by_type(&self, object_type: ObjectType, size_limit: usize) -> Result<RawSearchResult>;

    /// Fetch documents by id, in request order
    async fn bulk_get(&self, ids: &[String]) -> Result<Vec<BulkDoc>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_doc_accessors() {
        let doc: RawDoc = serde_json::from_value(json!({
            "_id": "search:s1",
            "_index": ".kibana",
            "_source": { "type": "search", "search": { "title": "Errors" } }
        }))
        .unwrap();

        assert_eq!(doc.declared_type(), Some("search"));
        assert_eq!(doc.payload(ObjectType::Search).unwrap()["title"], "Errors");
        assert!(doc.payload(ObjectType::Dashboard).is_none());
    }

    #[test]
    fn test_bulk_doc_not_found_shape() {
        let doc: BulkDoc = serde_json::from_value(json!({ "_id": "search:x", "found": false })).unwrap();
        assert_eq!(doc, BulkDoc::not_found("search:x"));
    }
}
