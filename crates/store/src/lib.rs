//! Document-store layer for the saved-object graph
//!
//! Provides the `StoreClient` seam with an Elasticsearch HTTP
//! implementation and an in-memory one, plus connection configuration.

pub mod client;
pub mod config;
pub mod elastic;
pub mod error;
pub mod memory;

pub use client::{BulkDoc, RawDoc, RawSearchResult, StoreClient};
pub use config::{AppConfig, ClientOptions, ClusterConfig, ClusterSettings};
pub use elastic::ElasticClient;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
