//! Export records - portable copies of saved objects

use crate::ObjectType;
use serde::{Deserialize, Serialize};

/// One saved object in the store's import format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRecord {
    /// Raw id, without the type prefix
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_type")]
    pub object_type: ObjectType,

    /// The type-namespaced payload, verbatim
    #[serde(rename = "_source")]
    pub source: serde_json::Value,
}
