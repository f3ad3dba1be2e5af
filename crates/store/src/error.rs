//! Store error types

use std::sync::Arc;
use thiserror::Error;

/// Errors talking to the document store.
///
/// Inner errors are reference-counted so one failure can be handed to
/// every caller waiting on the same refresh.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Store unreachable at {url}: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    #[error("Store returned {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] Arc<std::io::Error>),
}

impl StoreError {
    pub fn unavailable(url: impl Into<String>, source: reqwest::Error) -> Self {
        StoreError::Unavailable {
            url: url.into(),
            source: Arc::new(source),
        }
    }

    pub fn decode(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        StoreError::Decode {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
