use super::{Endpoint, FetchError, IncidentSource};
use crate::config::UpstreamConfig;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Reads the summary and incident list from the upstream JSON API.
pub struct HttpSource {
    client: Client,
    base_url: String,
    summary_path: String,
    incidents_path: String,
}

impl HttpSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            summary_path: config.summary_path.clone(),
            incidents_path: config.incidents_path.clone(),
        })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::Summary => &self.summary_path,
            Endpoint::Incidents => &self.incidents_path,
        };
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl IncidentSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
        let url = self.url(endpoint);
        debug!(%url, %endpoint, "fetching");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| FetchError::Request { url: url.clone(), source })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { origin: url, source })
    }
}
