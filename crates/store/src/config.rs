//! Connection and cache configuration
//!
//! A config file holds global defaults plus a list of source clusters.
//! Each cluster may override the global values; cluster values win.

use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Index holding saved objects when a cluster names none
pub const DEFAULT_INDEX: &str = ".kibana";

/// Page size of each type query when the config names none
pub const DEFAULT_QUERY_SIZE_LIMIT: usize = 10_000;

/// Cache lifetime when neither the cluster nor the global config names one
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// HTTP client options, mergeable field by field
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientOptions {
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Mapping type inserted into multi-get paths on older stores
    #[serde(default)]
    pub doc_type: Option<String>,
}

impl ClientOptions {
    /// `self` overridden by any field set in `other`
    pub fn merged(&self, other: &ClientOptions) -> ClientOptions {
        ClientOptions {
            request_timeout_ms: other.request_timeout_ms.or(self.request_timeout_ms),
            doc_type: other.doc_type.clone().or_else(|| self.doc_type.clone()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// One source cluster as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Display name, defaults to the host
    #[serde(default)]
    pub name: Option<String>,

    pub host: String,

    #[serde(default)]
    pub index_name: Option<String>,

    #[serde(default)]
    pub max_age_ms: Option<u64>,

    #[serde(default)]
    pub client: ClientOptions,
}

impl ClusterConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            name: None,
            host: host.into(),
            index_name: None,
            max_age_ms: None,
            client: ClientOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }
}

/// The whole config file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub query_size_limit: Option<usize>,

    #[serde(default)]
    pub max_age_ms: Option<u64>,

    #[serde(default)]
    pub client: ClientOptions,

    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,
}

/// Settings for one cluster after merging with the global defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    pub name: String,
    pub host: String,
    pub index_name: String,
    pub query_size_limit: usize,
    pub max_age: Duration,
    pub client: ClientOptions,
}

impl AppConfig {
    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());

        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for a single cluster with all defaults
    pub fn single(host: impl Into<String>, index_name: Option<String>) -> Self {
        let mut cluster = ClusterConfig::new(host);
        cluster.index_name = index_name;
        Self {
            clusters: vec![cluster],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.clusters.is_empty() {
            return Err(StoreError::Config("no clusters configured".into()));
        }
        if self.query_size_limit == Some(0) {
            return Err(StoreError::Config("query_size_limit must be positive".into()));
        }

        let mut seen = HashSet::new();
        for cluster in &self.clusters {
            if cluster.host.trim().is_empty() {
                return Err(StoreError::Config(format!("cluster {} has an empty host", cluster.name())));
            }
            if !seen.insert(cluster.name()) {
                return Err(StoreError::Config(format!("duplicate cluster name: {}", cluster.name())));
            }
        }
        Ok(())
    }

    /// Merge one cluster with the global defaults
    pub fn resolve(&self, cluster: &ClusterConfig) -> ClusterSettings {
        ClusterSettings {
            name: cluster.name().to_string(),
            host: cluster.host.clone(),
            index_name: cluster
                .index_name
                .clone()
                .unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            query_size_limit: self.query_size_limit.unwrap_or(DEFAULT_QUERY_SIZE_LIMIT),
            max_age: resolve_max_age(cluster.max_age_ms, self.max_age_ms),
            client: self.client.merged(&cluster.client),
        }
    }

    /// All clusters, merged
    pub fn resolved(&self) -> Vec<ClusterSettings> {
        self.clusters.iter().map(|c| self.resolve(c)).collect()
    }
}

/// Cluster override, else global default, else five minutes
pub fn resolve_max_age(cluster_ms: Option<u64>, global_ms: Option<u64>) -> Duration {
    cluster_ms
        .or(global_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_MAX_AGE)
}
