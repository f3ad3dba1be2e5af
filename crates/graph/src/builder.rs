//! Graph builder - turns the saved-object index into nodes and edges

use crate::{GraphError, Result};
use kgraph_core::node::MISSING_NODE_ID;
use kgraph_core::{Edge, Graph, Node, ObjectType, PanelEntry, SearchSourceRef};
use kgraph_store::{RawDoc, RawSearchResult, StoreClient};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const SEARCH_SOURCE_FIELD: &str = "searchSourceJSON";
const PANELS_FIELD: &str = "panelsJSON";
const SAVED_SEARCH_FIELD: &str = "savedSearchId";

/// Builds a fresh `Graph` from the store on every `fetch`
#[derive(Clone)]
pub struct GraphBuilder {
    store: Arc<dyn StoreClient>,
    size_limit: usize,
}

impl GraphBuilder {
    /// Create a new builder; `size_limit` caps each type query
    pub fn new(store: Arc<dyn StoreClient>, size_limit: usize) -> Self {
        Self { store, size_limit }
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    /// Query all four stored types concurrently and assemble the graph
    #[instrument(skip(self), fields(size_limit = self.size_limit))]
    pub async fn fetch(&self) -> Result<Graph> {
        let started = Instant::now();
        info!("Fetching saved objects");

        match self.build().await {
            Ok(graph) => {
                info!(
                    nodes = graph.nodes.len(),
                    edges = graph.edges.len(),
                    missing = graph.has_missing(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Built graph"
                );
                Ok(graph)
            }
            Err(e) => {
                warn!(error = %e, "Graph fetch failed");
                Err(e)
            }
        }
    }

    async fn build(&self) -> Result<Graph> {
        let (index_patterns, searches, visualizations, dashboards) = tokio::try_join!(
            self.query(ObjectType::IndexPattern),
            self.query(ObjectType::Search),
            self.query(ObjectType::Visualization),
            self.query(ObjectType::Dashboard),
        )?;

        let results = [
            (ObjectType::IndexPattern, index_patterns),
            (ObjectType::Search, searches),
            (ObjectType::Visualization, visualizations),
            (ObjectType::Dashboard, dashboards),
        ];

        let mut nodes = Vec::new();
        for (object_type, result) in &results {
            nodes.extend(self.map_type(*object_type, result)?);
        }

        let mut edges = Vec::new();
        for (object_type, result) in &results {
            edges.extend(Self::extract_edges(*object_type, &result.hits)?);
        }

        let (nodes, edges) = Self::reconcile_missing(nodes, edges);
        Ok(Graph::new(nodes, edges))
    }

    async fn query(&self, object_type: ObjectType) -> Result<RawSearchResult> {
        let result = self.store.query_by_type(object_type, self.size_limit).await?;
        debug!("Got {} objects of type {}", result.hits.len(), object_type);
        Ok(result)
    }

    /// Map one type's hits to nodes, refusing incomplete pages
    pub fn map_type(&self, object_type: ObjectType, result: &RawSearchResult) -> Result<Vec<Node>> {
        if result.total > self.size_limit as u64 {
            return Err(GraphError::ResultTruncated {
                object_type,
                total: result.total,
                limit: self.size_limit,
            });
        }

        Ok(result
            .hits
            .iter()
            .map(|hit| {
                let id = object_type.node_id(&hit.id);
                let title = hit
                    .payload(object_type)
                    .and_then(|p| p.get("title"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.clone());
                Node::new(id, object_type, title)
            })
            .collect())
    }

    /// Derive the outgoing references of one type's hits
    pub fn extract_edges(object_type: ObjectType, hits: &[RawDoc]) -> Result<Vec<Edge>> {
        let mut edges = Vec::new();
        for hit in hits {
            match object_type {
                ObjectType::Search => search_edges(hit, &mut edges)?,
                ObjectType::Visualization => visualization_edges(hit, &mut edges)?,
                ObjectType::Dashboard => dashboard_edges(hit, &mut edges)?,
                ObjectType::IndexPattern | ObjectType::Missing => {}
            }
        }
        Ok(edges)
    }

    /// Point every dangling edge at a single synthetic missing node
    pub fn reconcile_missing(mut nodes: Vec<Node>, mut edges: Vec<Edge>) -> (Vec<Node>, Vec<Edge>) {
        let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let dangling: Vec<usize> = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !known.contains(e.target.as_str()))
            .map(|(i, _)| i)
            .collect();

        if dangling.is_empty() {
            return (nodes, edges);
        }

        debug!("{} edges point at missing objects", dangling.len());
        let missing = Node::missing();
        for i in dangling {
            edges[i].target = missing.id.clone();
        }
        nodes.push(missing);
        (nodes, edges)
    }
}

fn search_edges(hit: &RawDoc, edges: &mut Vec<Edge>) -> Result<()> {
    let object_type = ObjectType::Search;
    let raw = meta_string(hit, object_type, SEARCH_SOURCE_FIELD)?.ok_or_else(|| GraphError::ParseError {
        object_type,
        id: hit.id.clone(),
        field: SEARCH_SOURCE_FIELD,
        message: "field is absent".into(),
    })?;

    // a search always references an index pattern; without one the edge is dangling
    let target = match parse_search_source(hit, object_type, raw)?.index {
        Some(index) => ObjectType::IndexPattern.node_id(&index),
        None => MISSING_NODE_ID.to_string(),
    };
    edges.push(Edge::new(object_type.node_id(&hit.id), target));
    Ok(())
}

fn visualization_edges(hit: &RawDoc, edges: &mut Vec<Edge>) -> Result<()> {
    let object_type = ObjectType::Visualization;
    let id = object_type.node_id(&hit.id);

    if let Some(search_id) = payload_string(hit, object_type, SAVED_SEARCH_FIELD)? {
        edges.push(Edge::new(id.clone(), ObjectType::Search.node_id(search_id)));
    }

    if let Some(raw) = meta_string(hit, object_type, SEARCH_SOURCE_FIELD)? {
        if let Some(index) = parse_search_source(hit, object_type, raw)?.index {
            edges.push(Edge::new(id, ObjectType::IndexPattern.node_id(&index)));
        }
    }
    Ok(())
}

fn dashboard_edges(hit: &RawDoc, edges: &mut Vec<Edge>) -> Result<()> {
    let object_type = ObjectType::Dashboard;
    let Some(raw) = payload_string(hit, object_type, PANELS_FIELD)? else {
        return Ok(());
    };

    let panels = PanelEntry::parse_list(raw).map_err(|e| parse_error(hit, object_type, PANELS_FIELD, e))?;
    let id = object_type.node_id(&hit.id);

    for panel in panels {
        let Some(child_type) = panel
            .panel_type
            .as_deref()
            .and_then(|t| t.parse::<ObjectType>().ok())
            .filter(ObjectType::is_dashboard_child)
        else {
            continue;
        };

        let child_id = panel.id.ok_or_else(|| GraphError::ParseError {
            object_type,
            id: hit.id.clone(),
            field: PANELS_FIELD,
            message: format!("{} panel without an id", child_type),
        })?;
        edges.push(Edge::new(id.clone(), child_type.node_id(&child_id)));
    }
    Ok(())
}

fn parse_search_source(hit: &RawDoc, object_type: ObjectType, raw: &str) -> Result<SearchSourceRef> {
    SearchSourceRef::parse(raw).map_err(|e| parse_error(hit, object_type, SEARCH_SOURCE_FIELD, e))
}

/// Non-empty string field of the type payload
fn payload_string<'a>(hit: &'a RawDoc, object_type: ObjectType, field: &'static str) -> Result<Option<&'a str>> {
    string_field(hit, object_type, field, hit.payload(object_type).and_then(|p| p.get(field)))
}

/// Non-empty string field of the payload's `kibanaSavedObjectMeta`
fn meta_string<'a>(hit: &'a RawDoc, object_type: ObjectType, field: &'static str) -> Result<Option<&'a str>> {
    let value = hit
        .payload(object_type)
        .and_then(|p| p.get("kibanaSavedObjectMeta"))
        .and_then(|m| m.get(field));
    string_field(hit, object_type, field, value)
}

fn string_field<'a>(
    hit: &RawDoc,
    object_type: ObjectType,
    field: &'static str,
    value: Option<&'a Value>,
) -> Result<Option<&'a str>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(parse_error(hit, object_type, field, format!("expected a string, got {}", other))),
    }
}

fn parse_error(hit: &RawDoc, object_type: ObjectType, field: &'static str, err: impl std::fmt::Display) -> GraphError {
    GraphError::ParseError {
        object_type,
        id: hit.id.clone(),
        field,
        message: err.to_string(),
    }
}
