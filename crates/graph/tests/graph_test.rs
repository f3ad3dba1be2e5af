//! Integration tests for graph building, caching and export

mod common;

use common::*;
use kgraph_core::{Edge, ObjectType};
use kgraph_graph::{Exporter, GraphBuilder, GraphCache, GraphError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// One object of each type referencing the next yields a clean chain
#[tokio::test]
async fn test_fetch_chain() {
    let builder = GraphBuilder::new(Arc::new(chain_store()), 100);
    let graph = builder.fetch().await.expect("fetch failed");

    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(
        graph.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["index-pattern:ip1", "search:s1", "visualization:v1", "dashboard:d1"]
    );
    assert_eq!(
        graph.edges,
        vec![
            Edge::new("search:s1", "index-pattern:ip1"),
            Edge::new("visualization:v1", "search:s1"),
            Edge::new("dashboard:d1", "visualization:v1"),
        ]
    );
    assert!(!graph.has_missing());
    assert_eq!(graph.node("dashboard:d1").unwrap().title, "Overview");
}

/// Dangling references from different types share one missing node
#[tokio::test]
async fn test_fetch_rewires_dangling_references() {
    let store = store_with(vec![
        search("s1", "Orphan search", "ip-deleted"),
        dashboard(
            "d1",
            "Broken",
            json!([
                { "type": "visualization", "id": "v-deleted" },
                { "type": "search", "id": "s1" }
            ]),
        ),
    ]);

    let graph = GraphBuilder::new(Arc::new(store), 100).fetch().await.unwrap();

    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.count_by_type()[&ObjectType::Missing], 1);
    assert_eq!(
        graph.edges,
        vec![
            Edge::new("search:s1", "missing"),
            Edge::new("dashboard:d1", "missing"),
            Edge::new("dashboard:d1", "search:s1"),
        ]
    );
}

/// An incomplete page for any type fails the whole fetch
#[tokio::test]
async fn test_fetch_fails_when_truncated() {
    let store = store_with(vec![
        search("s1", "A", "ip1"),
        search("s2", "B", "ip1"),
        search("s3", "C", "ip1"),
    ]);

    let err = GraphBuilder::new(Arc::new(store), 2).fetch().await.unwrap_err();
    assert!(matches!(
        err,
        GraphError::ResultTruncated { object_type: ObjectType::Search, total: 3, limit: 2 }
    ));
}

/// One malformed document fails the whole fetch
#[tokio::test]
async fn test_fetch_fails_on_malformed_metadata() {
    let store = chain_store();
    store.insert(
        "dashboard:d2",
        json!({ "type": "dashboard", "dashboard": { "title": "Bad", "panelsJSON": "[{" } }),
    );

    let err = GraphBuilder::new(Arc::new(store), 100).fetch().await.unwrap_err();
    match err {
        GraphError::ParseError { object_type, id, .. } => {
            assert_eq!(object_type, ObjectType::Dashboard);
            assert_eq!(id, "dashboard:d2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Ten callers on a cold cache trigger one fetch and see the same graph
#[tokio::test]
async fn test_cache_single_flight() {
    let store = Arc::new(chain_store().with_latency(Duration::from_millis(20)));
    let cache = GraphCache::new(GraphBuilder::new(store.clone(), 100), Duration::from_secs(300));

    let results = futures::future::join_all((0..10).map(|_| cache.get())).await;
    let graphs: Vec<_> = results.into_iter().map(|r| r.expect("get failed")).collect();

    assert_eq!(store.query_calls(), 4);
    assert!(graphs.iter().all(|g| Arc::ptr_eq(g, &graphs[0])));
    assert_eq!(graphs[0].edges.len(), 3);

    cache.get().await.unwrap();
    assert_eq!(store.query_calls(), 4);
}

/// Exporting an unknown id reports it
#[tokio::test]
async fn test_export_not_found() {
    let exporter = Exporter::new(Arc::new(chain_store()));
    let err = exporter.export(&["search:missing-id".to_string()]).await.unwrap_err();

    match err {
        GraphError::ObjectsNotFound { missing_ids } => assert_eq!(missing_ids, vec!["search:missing-id"]),
        other => panic!("unexpected error: {other}"),
    }
}

/// Exported payloads are the stored payloads, in request order
#[tokio::test]
async fn test_export_round_trip() {
    let docs = vec![
        dashboard("d1", "Overview", json!([{ "type": "visualization", "id": "v1" }])),
        search("s1", "Errors", "ip1"),
        visualization("v1", "Errors over time", "s1"),
    ];
    let store = store_with(docs.clone());
    let exporter = Exporter::new(Arc::new(store));

    let ids = vec!["visualization:v1".to_string(), "dashboard:d1".to_string(), "search:s1".to_string()];
    let records = exporter.export(&ids).await.unwrap();

    assert_eq!(records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["v1", "d1", "s1"]);
    for record in &records {
        let (_, original) = docs
            .iter()
            .find(|(id, _)| id == &format!("{}:{}", record.object_type, record.id))
            .unwrap();
        assert_eq!(&record.source, &original[record.object_type.as_str()]);
    }
}

/// Index patterns are graph nodes but cannot be exported
#[tokio::test]
async fn test_export_rejects_index_pattern() {
    let exporter = Exporter::new(Arc::new(chain_store()));
    let err = exporter
        .export(&["search:s1".to_string(), "index-pattern:ip1".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::UnsupportedExportType { ref id, .. } if id == "index-pattern:ip1"));
}
