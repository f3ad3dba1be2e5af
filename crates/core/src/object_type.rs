//! Object types - the fixed set of saved-object kinds

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separator between the type prefix and the raw id in a store id
pub const ID_SEPARATOR: char = ':';

/// The kind of a saved object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    /// An index-pattern definition
    IndexPattern,
    /// A saved search
    Search,
    /// A visualization
    Visualization,
    /// A dashboard
    Dashboard,
    /// Synthetic placeholder for references that resolve to nothing
    Missing,
}

impl ObjectType {
    /// Kinds that exist in the store, in fetch order
    pub const ALL_STORED: [ObjectType; 4] = [
        ObjectType::IndexPattern,
        ObjectType::Search,
        ObjectType::Visualization,
        ObjectType::Dashboard,
    ];

    /// Kinds a dashboard panel may point at
    pub const DASHBOARD_CHILDREN: [ObjectType; 2] = [ObjectType::Visualization, ObjectType::Search];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::IndexPattern => "index-pattern",
            ObjectType::Search => "search",
            ObjectType::Visualization => "visualization",
            ObjectType::Dashboard => "dashboard",
            ObjectType::Missing => "missing",
        }
    }

    /// Whether objects of this kind can be exported
    pub fn is_exportable(&self) -> bool {
        match self {
            ObjectType::Search | ObjectType::Visualization | ObjectType::Dashboard => true,
            ObjectType::IndexPattern | ObjectType::Missing => false,
        }
    }

    /// Whether a dashboard panel of this kind yields an edge
    pub fn is_dashboard_child(&self) -> bool {
        Self::DASHBOARD_CHILDREN.contains(self)
    }

    /// Build the graph-wide id for a raw store id.
    ///
    /// Store ids of the form `<type>:<id>` are kept as they are; bare ids
    /// get the type prefix.
    pub fn node_id(&self, raw_id: &str) -> String {
        match raw_id.strip_prefix(self.as_str()) {
            Some(rest) if rest.starts_with(ID_SEPARATOR) => raw_id.to_string(),
            _ => format!("{}{}{}", self.as_str(), ID_SEPARATOR, raw_id),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index-pattern" => Ok(ObjectType::IndexPattern),
            "search" => Ok(ObjectType::Search),
            "visualization" => Ok(ObjectType::Visualization),
            "dashboard" => Ok(ObjectType::Dashboard),
            "missing" => Ok(ObjectType::Missing),
            other => Err(CoreError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_forms_round_trip() {
        for t in ObjectType::ALL_STORED.iter().chain([ObjectType::Missing].iter()) {
            assert_eq!(t.as_str().parse::<ObjectType>().unwrap(), *t);
            assert_eq!(serde_json::to_string(t).unwrap(), format!("\"{}\"", t));
        }
    }

    #[test]
    fn test_unknown_type() {
        let err = "config".parse::<ObjectType>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownType(ref s) if s == "config"));
    }

    #[test]
    fn test_node_id_prefixing() {
        assert_eq!(ObjectType::Search.node_id("s1"), "search:s1");
        assert_eq!(ObjectType::Search.node_id("search:s1"), "search:s1");
        // a prefix of a different type is part of the raw id
        assert_eq!(ObjectType::IndexPattern.node_id("search:s1"), "index-pattern:search:s1");
        assert_eq!(ObjectType::Search.node_id("searchable"), "search:searchable");
    }

    #[test]
    fn test_exportable_and_children() {
        assert!(ObjectType::Dashboard.is_exportable());
        assert!(!ObjectType::IndexPattern.is_exportable());
        assert!(!ObjectType::Missing.is_exportable());
        assert!(ObjectType::Visualization.is_dashboard_child());
        assert!(ObjectType::Search.is_dashboard_child());
        assert!(!ObjectType::Dashboard.is_dashboard_child());
    }
}
