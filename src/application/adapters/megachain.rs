//! Megachain Adapter
//!
//! Full ingestion pipeline for Megachain networks: select an endpoint, fetch
//! the raw block, decode it through the factory, verify the witness
//! signatures against the rid, and persist everything atomically.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::adapters::chain_adapter::ChainAdapter;
use crate::application::adapters::inflight::InflightIngestions;
use crate::domain::gateways::{BlockStore, ChainClient, RpcEndpointRepository};
use crate::domain::models::block::Block;
use crate::domain::models::blockchain::{Blockchain, RpcEndpoint};
use crate::shared::errors::IngestError;

/// Adapter for a registered Megachain network
pub struct MegachainAdapter {
    blockchain: Blockchain,
    endpoints: Arc<dyn RpcEndpointRepository>,
    blocks: Arc<dyn BlockStore>,
    client: Arc<dyn ChainClient>,
    inflight: Arc<InflightIngestions>,
    max_fetch_attempts: usize,
}

impl MegachainAdapter {
    #[must_use]
    pub fn new(
        blockchain: Blockchain,
        endpoints: Arc<dyn RpcEndpointRepository>,
        blocks: Arc<dyn BlockStore>,
        client: Arc<dyn ChainClient>,
        inflight: Arc<InflightIngestions>,
        max_fetch_attempts: usize,
    ) -> Self {
        Self {
            blockchain,
            endpoints,
            blocks,
            client,
            inflight,
            max_fetch_attempts,
        }
    }

    /// Endpoints in registration order, or a configuration error when none
    /// are registered.
    async fn usable_endpoints(&self) -> Result<Vec<RpcEndpoint>, IngestError> {
        let endpoints = self.endpoints.list(self.blockchain.id()).await?;
        if endpoints.is_empty() {
            return Err(IngestError::Configuration(format!(
                "No RPC endpoints registered for chain {}",
                self.blockchain.chain_id()
            )));
        }
        Ok(endpoints)
    }

    /// Run `op` against each endpoint in order until one succeeds, with the
    /// total attempt count bounded. Only fetch failures fall over to the
    /// next endpoint; anything else is returned as-is.
    async fn with_endpoint_fallback<T, F, Fut>(
        &self,
        endpoints: &[RpcEndpoint],
        mut op: F,
    ) -> Result<T, IngestError>
    where
        F: FnMut(String) -> Fut,
        Fut: std::future::Future<Output = Result<T, IngestError>>,
    {
        let mut last_error = None;
        for endpoint in endpoints.iter().take(self.max_fetch_attempts) {
            match op(endpoint.url.clone()).await {
                Ok(value) => return Ok(value),
                Err(IngestError::Fetch(reason)) => {
                    tracing::warn!(
                        chain_id = %self.blockchain.chain_id(),
                        endpoint = %endpoint.url,
                        %reason,
                        "Endpoint fetch failed, falling back"
                    );
                    last_error = Some(IngestError::Fetch(reason));
                }
                Err(other) => return Err(other),
            }
        }
        Err(last_error
            .unwrap_or_else(|| IngestError::Fetch("No endpoint could be attempted".to_string())))
    }
}

#[async_trait]
impl ChainAdapter for MegachainAdapter {
    async fn remote_latest_height(&self) -> Result<i64, IngestError> {
        let endpoints = self.usable_endpoints().await?;
        let chain_id = self.blockchain.chain_id().to_string();
        self.with_endpoint_fallback(&endpoints, |endpoint| {
            let client = Arc::clone(&self.client);
            let chain_id = chain_id.clone();
            async move { client.fetch_latest_height(&endpoint, &chain_id).await }
        })
        .await
    }

    async fn local_synced_height(&self) -> Result<Option<i64>, IngestError> {
        Ok(self.blocks.max_height(self.blockchain.id()).await?)
    }

    async fn block_at_height(
        &self,
        height: i64,
        include_transactions: bool,
    ) -> Result<Option<Block>, IngestError> {
        if height < 0 {
            return Err(IngestError::Validation(
                "Block height cannot be negative".to_string(),
            ));
        }
        let block = self
            .blocks
            .find_by_height(self.blockchain.id(), height, include_transactions)
            .await?;
        Ok(block.map(Block::Megachain))
    }

    async fn rpc_endpoints(&self) -> Result<Vec<RpcEndpoint>, IngestError> {
        Ok(self.endpoints.list(self.blockchain.id()).await?)
    }

    async fn register_rpc_endpoint(&self, url: &str) -> Result<RpcEndpoint, IngestError> {
        tracing::info!(
            chain_id = %self.blockchain.chain_id(),
            %url,
            "Registering RPC endpoint"
        );
        Ok(self.endpoints.add(self.blockchain.id(), url).await?)
    }

    async fn ingest_block(&self, height: i64) -> Result<Block, IngestError> {
        // Height bound check before any network traffic.
        if height < 0 {
            return Err(IngestError::Validation(
                "Block height cannot be negative".to_string(),
            ));
        }

        // Claim the (chain, height) slot before fetching so concurrent
        // duplicate calls do not both hit the network.
        let _permit = self
            .inflight
            .try_begin(self.blockchain.id(), height)
            .ok_or_else(|| {
                IngestError::Conflict(format!(
                    "Ingestion already in progress for chain {} height {height}",
                    self.blockchain.chain_id()
                ))
            })?;

        let endpoints = self.usable_endpoints().await?;
        tracing::info!(
            chain_id = %self.blockchain.chain_id(),
            height,
            "Ingesting block"
        );

        let chain_id = self.blockchain.chain_id().to_string();
        let raw = self
            .with_endpoint_fallback(&endpoints, |endpoint| {
                let client = Arc::clone(&self.client);
                let chain_id = chain_id.clone();
                async move { client.fetch_block(&endpoint, &chain_id, height).await }
            })
            .await?;

        let block = Block::from_wire(
            self.blockchain.kind(),
            self.blockchain.chain_id(),
            raw,
        )?;
        let Block::Megachain(block) = block else {
            return Err(IngestError::Configuration(
                "Megachain adapter built a non-Megachain block".to_string(),
            ));
        };

        if !block.is_valid() {
            tracing::warn!(
                chain_id = %self.blockchain.chain_id(),
                height,
                "Block failed witness verification"
            );
            return Err(IngestError::Validation(
                "Block witness failed verification".to_string(),
            ));
        }

        self.blocks.insert_megachain_block(&block).await?;
        tracing::info!(
            chain_id = %self.blockchain.chain_id(),
            height,
            rid = %hex::encode(&block.rid),
            "Block ingested"
        );

        Ok(Block::Megachain(block))
    }
}
