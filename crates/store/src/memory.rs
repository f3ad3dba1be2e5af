//! In-process store, used by tests and for offline runs against a dump

use crate::{BulkDoc, RawDoc, RawSearchResult, Result, StoreClient, StoreError};
use async_trait::async_trait;
use kgraph_core::ObjectType;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

const MEMORY_URL: &str = "memory://";

/// Documents held in memory, with call counters
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<RawDoc>>,
    latency: Option<Duration>,
    unavailable: AtomicBool,
    query_calls: AtomicUsize,
    bulk_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_docs(docs: Vec<RawDoc>) -> Self {
        Self {
            docs: RwLock::new(docs),
            ..Self::default()
        }
    }

    /// Load a dump: a JSON array of `{ "_id": .., "_source": .. }`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let docs: Vec<RawDoc> = serde_json::from_str(&raw).map_err(|e| StoreError::decode(path.display().to_string(), e))?;
        debug!("Loaded {} documents from {}", docs.len(), path.display());
        Ok(Self::with_docs(docs))
    }

    /// Builder: delay every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add or replace a document
    pub fn insert(&self, id: impl Into<String>, source: Value) {
        let doc = RawDoc::new(id, source);
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
    }

    /// Make every subsequent call fail until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `query_by_type` calls so far
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Number of `bulk_get` calls so far
    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                url: MEMORY_URL.to_string(),
                status: 503,
                body: "store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn query_by_type(&self, object_type: ObjectType, size_limit: usize) -> Result<RawSearchResult> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;

        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        let matching: Vec<&RawDoc> = docs
            .iter()
            .filter(|d| d.declared_type() == Some(object_type.as_str()))
            .collect();

        Ok(RawSearchResult {
            total: matching.len() as u64,
            hits: matching.into_iter().take(size_limit).cloned().collect(),
        })
    }

    async fn bulk_get(&self, ids: &[String]) -> Result<Vec<BulkDoc>> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;

        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        Ok(ids
            .iter()
            .map(|id| match docs.iter().find(|d| &d.id == id) {
                Some(doc) => BulkDoc {
                    id: id.clone(),
                    found: true,
                    source: Some(doc.source.clone()),
                },
                None => BulkDoc::not_found(id.clone()),
            })
            .collect())
    }
}
