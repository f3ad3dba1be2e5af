//! Edge types - references between saved objects

use serde::{Deserialize, Serialize};

/// A directed reference from a referencing object to a referenced one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Id of the referencing node
    pub source: String,

    /// Id of the referenced node
    pub target: String,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let edge = Edge::new("visualization:v1", "search:s1");

        assert_eq!(edge.source, "visualization:v1");
        assert_eq!(edge.target, "search:s1");
    }
}
