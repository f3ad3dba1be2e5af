//! Common test utilities

use kgraph_store::MemoryStore;
use serde_json::{json, Value};

pub fn index_pattern(id: &str, title: &str) -> (String, Value) {
    (
        format!("index-pattern:{id}"),
        json!({ "type": "index-pattern", "index-pattern": { "title": title, "timeFieldName": "@timestamp" } }),
    )
}

pub fn search(id: &str, title: &str, index: &str) -> (String, Value) {
    (
        format!("search:{id}"),
        json!({ "type": "search", "search": {
            "title": title,
            "columns": ["message"],
            "kibanaSavedObjectMeta": {
                "searchSourceJSON": json!({ "index": index, "query": { "query": "*" } }).to_string()
            }
        }}),
    )
}

pub fn visualization(id: &str, title: &str, saved_search: &str) -> (String, Value) {
    (
        format!("visualization:{id}"),
        json!({ "type": "visualization", "visualization": {
            "title": title,
            "savedSearchId": saved_search,
            "visState": "{\"type\":\"histogram\"}",
            "kibanaSavedObjectMeta": { "searchSourceJSON": "{\"filter\":[]}" }
        }}),
    )
}

pub fn dashboard(id: &str, title: &str, panels: Value) -> (String, Value) {
    (
        format!("dashboard:{id}"),
        json!({ "type": "dashboard", "dashboard": {
            "title": title,
            "panelsJSON": panels.to_string()
        }}),
    )
}

/// Create a store holding the given documents
pub fn store_with(docs: Vec<(String, Value)>) -> MemoryStore {
    let store = MemoryStore::new();
    for (id, source) in docs {
        store.insert(id, source);
    }
    store
}

/// ip1 <- s1 <- v1 <- d1
pub fn chain_store() -> MemoryStore {
    store_with(vec![
        index_pattern("ip1", "logs-*"),
        search("s1", "Errors", "ip1"),
        visualization("v1", "Errors over time", "s1"),
        dashboard("d1", "Overview", json!([{ "type": "visualization", "id": "v1" }])),
    ])
}
