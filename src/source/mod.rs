//! Upstream payload sources.
//!
//! The dashboard only ever reads two JSON documents: the summary and the
//! incident list. A source returns them as raw JSON; shape handling is left
//! to [`crate::incident`].

pub mod file;
pub mod http;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("invalid JSON from {origin}: {source}")]
    Decode {
        origin: String,
        source: serde_json::Error,
    },
}

/// The two upstream documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Summary,
    Incidents,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Summary => write!(f, "summary"),
            Endpoint::Incidents => write!(f, "incidents"),
        }
    }
}

/// Trait for anything that can supply upstream payloads.
#[async_trait::async_trait]
pub trait IncidentSource: Send + Sync {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    /// Fetch one document. Failures are reported, never retried.
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, FetchError>;
}
