//! Dependency graph over saved objects
//!
//! This crate contains the components that sit on top of the store:
//! - GraphBuilder: fetches every object type and derives nodes and edges
//! - GraphCache: serves the graph with a TTL and single-flight refresh
//! - Exporter: re-shapes stored objects into portable export records
//! - ClusterSet: one cache and exporter per configured source cluster

pub mod builder;
pub mod cache;
pub mod cluster;
pub mod exporter;
pub mod error;

pub use builder::GraphBuilder;
pub use cache::GraphCache;
pub use cluster::{Cluster, ClusterSet};
pub use exporter::Exporter;
pub use error::{GraphError, Result};
