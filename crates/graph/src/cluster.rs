//! One graph cache and exporter per configured source cluster

use crate::{Exporter, GraphBuilder, GraphCache, GraphError, Result};
use kgraph_core::{ExportRecord, Graph};
use kgraph_store::{AppConfig, ClusterSettings, ElasticClient, StoreClient, StoreError};
use std::sync::Arc;
use tracing::info;

/// A source cluster with its own cache
pub struct Cluster {
    pub settings: ClusterSettings,
    pub cache: GraphCache,
    pub exporter: Exporter,
}

impl Cluster {
    /// Wire a cluster to an arbitrary store
    pub fn new(settings: ClusterSettings, store: Arc<dyn StoreClient>) -> Self {
        let builder = GraphBuilder::new(store.clone(), settings.query_size_limit);
        Self {
            cache: GraphCache::new(builder, settings.max_age),
            exporter: Exporter::new(store),
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }
}

/// All configured clusters, in config order
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Connect to every cluster in `config` over HTTP
    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, StoreError> {
        config.validate()?;

        let clusters = config
            .resolved()
            .into_iter()
            .map(|settings| -> std::result::Result<Cluster, StoreError> {
                let client = ElasticClient::from_settings(&settings)?;
                info!(
                    cluster = %settings.name,
                    host = %settings.host,
                    index = %settings.index_name,
                    max_age_ms = settings.max_age.as_millis() as u64,
                    "Configured cluster"
                );
                Ok(Cluster::new(settings, Arc::new(client)))
            })
            .collect::<std::result::Result<Vec<_>, StoreError>>()?;

        Ok(Self::new(clusters))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clusters.iter().map(Cluster::name)
    }

    /// Look up a cluster by name; `None` picks the first one
    pub fn cluster(&self, name: Option<&str>) -> Result<&Cluster> {
        match name {
            Some(name) => self
                .clusters
                .iter()
                .find(|c| c.name() == name)
                .ok_or_else(|| GraphError::UnknownCluster(name.to_string())),
            None => self
                .clusters
                .first()
                .ok_or_else(|| GraphError::UnknownCluster("<none configured>".to_string())),
        }
    }

    pub async fn graph(&self, name: Option<&str>) -> Result<Arc<Graph>> {
        self.cluster(name)?.cache.get().await
    }

    pub async fn export(&self, name: Option<&str>, ids: &[String]) -> Result<Vec<ExportRecord>> {
        self.cluster(name)?.exporter.export(ids).await
    }
}
