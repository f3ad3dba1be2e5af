//! HTTP client for an Elasticsearch-compatible store

use crate::{BulkDoc, ClusterSettings, RawDoc, RawSearchResult, Result, StoreClient, StoreError};
use async_trait::async_trait;
use kgraph_core::ObjectType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Client for one saved-object index
#[derive(Clone)]
pub struct ElasticClient {
    client: reqwest::Client,
    base_url: String,
    index: String,
    doc_type: Option<String>,
}

impl ElasticClient {
    /// Create a new client with default HTTP settings
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
            doc_type: None,
        }
    }

    /// Build a client from merged cluster settings
    pub fn from_settings(settings: &ClusterSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.client.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Config(format!("HTTP client for {}: {}", settings.name, e)))?;

        Ok(Self {
            client,
            base_url: settings.host.trim_end_matches('/').to_string(),
            index: settings.index_name.clone(),
            doc_type: settings.client.doc_type.clone(),
        })
    }

    /// Builder: set the mapping type used in multi-get paths
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index)
    }

    fn mget_url(&self) -> String {
        match &self.doc_type {
            Some(doc_type) => format!("{}/{}/{}/_mget", self.base_url, self.index, doc_type),
            None => format!("{}/{}/_mget", self.base_url, self.index),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, url: &str, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::unavailable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::unavailable(url, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(url, e))
    }
}

#[async_trait]
impl StoreClient for ElasticClient {
    #[instrument(skip(self), fields(index = %self.index))]
    async fn query_by_type(&self, object_type: ObjectType, size_limit: usize) -> Result<RawSearchResult> {
        let url = self.search_url();
        let request = self.client.get(&url).query(&[
            ("q", format!("type:{}", object_type)),
            ("size", size_limit.to_string()),
        ]);

        let response: SearchResponse = self.read_json(&url, request).await?;
        debug!(
            "Got {} of {} objects of type {}",
            response.hits.hits.len(),
            response.hits.total.value(),
            object_type
        );

        Ok(RawSearchResult {
            total: response.hits.total.value(),
            hits: response.hits.hits,
        })
    }

    #[instrument(skip(self, ids), fields(index = %self.index, count = ids.len()))]
    async fn bulk_get(&self, ids: &[String]) -> Result<Vec<BulkDoc>> {
        let url = self.mget_url();
        let body = MgetRequest {
            docs: ids.iter().map(|id| MgetDoc { id }).collect(),
        };

        let response: MgetResponse = self.read_json(&url, self.client.post(&url).json(&body)).await?;
        Ok(response.docs)
    }
}

// ==========================================
// REQUEST/RESPONSE TYPES
// ==========================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    total: HitsTotal,
    #[serde(default)]
    hits: Vec<RawDoc>,
}

/// Older stores report a bare count, newer ones `{ value, relation }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HitsTotal {
    Count(u64),
    Object { value: u64 },
}

impl HitsTotal {
    fn value(&self) -> u64 {
        match self {
            HitsTotal::Count(n) => *n,
            HitsTotal::Object { value } => *value,
        }
    }
}

#[derive(Debug, Serialize)]
struct MgetRequest<'a> {
    docs: Vec<MgetDoc<'a>>,
}

#[derive(Debug, Serialize)]
struct MgetDoc<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct MgetResponse {
    docs: Vec<BulkDoc>,
}
