//! Exporter - portable copies of selected saved objects

use crate::{GraphError, Result};
use kgraph_core::object_type::ID_SEPARATOR;
use kgraph_core::{ExportRecord, ObjectType};
use kgraph_store::{BulkDoc, StoreClient};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Bulk-fetches objects by id and re-shapes them for import elsewhere
#[derive(Clone)]
pub struct Exporter {
    store: Arc<dyn StoreClient>,
}

impl Exporter {
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self { store }
    }

    /// Export `ids` in request order; all or nothing
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn export(&self, ids: &[String]) -> Result<Vec<ExportRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let docs = self.store.bulk_get(ids).await?;

        let missing_ids: Vec<String> = docs.iter().filter(|d| !d.found).map(|d| d.id.clone()).collect();
        if !missing_ids.is_empty() {
            warn!(missing = ?missing_ids, "Some objects couldn't be found");
            return Err(GraphError::ObjectsNotFound { missing_ids });
        }

        let records = docs.into_iter().map(export_record).collect::<Result<Vec<_>>>()?;
        info!("Exported {} objects", records.len());
        Ok(records)
    }
}

/// Re-shape one found document
pub fn export_record(doc: BulkDoc) -> Result<ExportRecord> {
    let mut source = doc.source.ok_or_else(|| GraphError::MissingPayload { id: doc.id.clone() })?;

    let declared = source.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
    let object_type = declared
        .parse::<ObjectType>()
        .ok()
        .filter(ObjectType::is_exportable)
        .ok_or_else(|| GraphError::UnsupportedExportType {
            id: doc.id.clone(),
            object_type: declared.clone(),
        })?;

    let parts: Vec<&str> = doc.id.split(ID_SEPARATOR).collect();
    let [_, raw_id] = parts.as_slice() else {
        return Err(GraphError::MalformedId(doc.id.clone()));
    };

    let payload = source
        .get_mut(object_type.as_str())
        .map(Value::take)
        .ok_or_else(|| GraphError::MissingPayload { id: doc.id.clone() })?;

    Ok(ExportRecord {
        id: raw_id.to_string(),
        object_type,
        source: payload,
    })
}
