//! Graph error types

use kgraph_core::ObjectType;
use kgraph_store::StoreError;
use thiserror::Error;

/// Errors building, caching or exporting the graph.
///
/// Clone so a failed refresh reaches every coalesced caller.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Didn't fetch all {object_type} objects: total {total} exceeds page size {limit}")]
    ResultTruncated {
        object_type: ObjectType,
        total: u64,
        limit: usize,
    },

    #[error("Malformed {field} in {object_type} {id}: {message}")]
    ParseError {
        object_type: ObjectType,
        id: String,
        field: &'static str,
        message: String,
    },

    #[error("Objects not found: {}", .missing_ids.join(", "))]
    ObjectsNotFound { missing_ids: Vec<String> },

    #[error("Unsupported object id: {0}")]
    MalformedId(String),

    #[error("Cannot export {id}: unsupported object type {object_type}")]
    UnsupportedExportType { id: String, object_type: String },

    #[error("Object {id} has no payload for its type")]
    MissingPayload { id: String },

    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
