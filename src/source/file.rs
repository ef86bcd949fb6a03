use std::path::PathBuf;

use super::{Endpoint, FetchError, IncidentSource};
use serde_json::Value;

/// Reads payloads from JSON files on disk.
pub struct FileSource {
    summary: PathBuf,
    incidents: PathBuf,
}

impl FileSource {
    pub fn new(summary: impl Into<PathBuf>, incidents: impl Into<PathBuf>) -> Self {
        Self {
            summary: summary.into(),
            incidents: incidents.into(),
        }
    }

    /// One file serves both documents.
    pub fn single(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path)
    }
}

#[async_trait::async_trait]
impl IncidentSource for FileSource {
    fn describe(&self) -> String {
        if self.summary == self.incidents {
            self.summary.display().to_string()
        } else {
            format!("{} + {}", self.summary.display(), self.incidents.display())
        }
    }

    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
        let path = match endpoint {
            Endpoint::Summary => &self.summary,
            Endpoint::Incidents => &self.incidents,
        };
        let origin = path.display().to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| FetchError::Io { path: origin.clone(), source })?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode { origin, source })
    }
}
