//! HTTP Chain Client
//!
//! Talks to a remote chain node over its block query API. One request per
//! call; retry and endpoint fallback live in the adapter layer, not here.

use async_trait::async_trait;

use crate::domain::gateways::ChainClient;
use crate::domain::models::payload::BlockSummaryPayload;
use crate::shared::errors::IngestError;

/// reqwest-backed implementation of `ChainClient`
pub struct HttpChainClient {
    http: reqwest::Client,
}

impl HttpChainClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, IngestError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| IngestError::Fetch(format!("Request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Fetch(format!(
                "Remote returned {status} for {url}"
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| IngestError::Format(format!("Remote response is not JSON: {err}")))
    }
}

impl Default for HttpChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn fetch_block(
        &self,
        endpoint: &str,
        chain_id: &str,
        height: i64,
    ) -> Result<serde_json::Value, IngestError> {
        let url = format!(
            "{}/blocks/{chain_id}/height/{height}",
            endpoint.trim_end_matches('/')
        );
        tracing::debug!(%url, "Fetching block");
        self.get_json(&url).await
    }

    async fn fetch_latest_height(
        &self,
        endpoint: &str,
        chain_id: &str,
    ) -> Result<i64, IngestError> {
        let url = format!(
            "{}/blocks/{chain_id}?limit=1",
            endpoint.trim_end_matches('/')
        );
        tracing::debug!(%url, "Fetching latest height");
        let value = self.get_json(&url).await?;

        let summaries: Vec<BlockSummaryPayload> = serde_json::from_value(value)
            .map_err(|err| IngestError::Format(format!("Unexpected block list shape: {err}")))?;

        summaries
            .first()
            .map(|summary| summary.height)
            .ok_or_else(|| IngestError::Fetch("Remote returned no blocks".to_string()))
    }
}
