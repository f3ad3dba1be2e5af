//! Core domain types for the saved-object graph
//!
//! This crate defines the fundamental data structures used throughout
//! the workspace: object types, graph nodes and edges, export records,
//! and the schemas of the reference metadata embedded in saved objects.

pub mod object_type;
pub mod node;
pub mod edge;
pub mod graph;
pub mod export;
pub mod reference;
pub mod error;

pub use object_type::ObjectType;
pub use node::Node;
pub use edge::Edge;
pub use graph::Graph;
pub use export::ExportRecord;
pub use reference::{PanelEntry, SearchSourceRef};
pub use error::{CoreError, Result};
