//! Node types - one vertex per saved object

use crate::ObjectType;
use serde::{Deserialize, Serialize};

/// Id of the synthetic node that stands in for every unresolved reference
pub const MISSING_NODE_ID: &str = "missing";

/// A vertex in the dependency graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Graph-wide unique id (`<type>:<rawId>`)
    pub id: String,

    /// The kind of saved object
    #[serde(rename = "type")]
    pub object_type: ObjectType,

    /// Display title
    pub title: String,
}

impl Node {
    /// Create a new node
    pub fn new(id: impl Into<String>, object_type: ObjectType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_type,
            title: title.into(),
        }
    }

    /// The placeholder node dangling edges are rewired to
    pub fn missing() -> Self {
        Self::new(MISSING_NODE_ID, ObjectType::Missing, "Missing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_serializes_type_field() {
        let node = Node::new("search:s1", ObjectType::Search, "Errors");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["id"], "search:s1");
        assert_eq!(json["type"], "search");
        assert_eq!(json["title"], "Errors");
    }

    #[test]
    fn test_missing_node() {
        let node = Node::missing();
        assert_eq!(node.id, "missing");
        assert_eq!(node.object_type, ObjectType::Missing);
        assert_eq!(node.title, "Missing");
    }
}
