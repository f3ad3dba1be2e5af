//! The node/edge graph handed to renderers

use crate::node::MISSING_NODE_ID;
use crate::{Edge, Node, ObjectType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable snapshot of all saved objects and their references
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Whether the synthetic missing node was added
    pub fn has_missing(&self) -> bool {
        self.node(MISSING_NODE_ID).is_some()
    }

    /// Ids of the nodes `id` points at
    pub fn targets_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == id)
            .map(|e| e.target.as_str())
    }

    /// Node count per object type
    pub fn count_by_type(&self) -> BTreeMap<ObjectType, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.object_type).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        Graph::new(
            vec![
                Node::new("index-pattern:ip1", ObjectType::IndexPattern, "logs-*"),
                Node::new("search:s1", ObjectType::Search, "Errors"),
                Node::new("search:s2", ObjectType::Search, "Warnings"),
            ],
            vec![
                Edge::new("search:s1", "index-pattern:ip1"),
                Edge::new("search:s2", "index-pattern:ip1"),
            ],
        )
    }

    #[test]
    fn test_lookup_and_targets() {
        let graph = sample();
        assert_eq!(graph.node("search:s2").unwrap().title, "Warnings");
        assert!(graph.node("search:nope").is_none());
        assert_eq!(graph.targets_of("search:s1").collect::<Vec<_>>(), vec!["index-pattern:ip1"]);
        assert!(!graph.has_missing());
    }

    #[test]
    fn test_count_by_type() {
        let counts = sample().count_by_type();
        assert_eq!(counts[&ObjectType::Search], 2);
        assert_eq!(counts[&ObjectType::IndexPattern], 1);
        assert!(!counts.contains_key(&ObjectType::Dashboard));
    }

    #[test]
    fn test_output_contract_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["nodes"][0]["type"], "index-pattern");
        assert_eq!(json["edges"][1]["source"], "search:s2");
        assert_eq!(json["edges"][1]["target"], "index-pattern:ip1");
    }
}
