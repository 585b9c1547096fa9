//! EVM Adapter
//!
//! Endpoint management is fully implemented; the live-chain fetch and
//! ingestion operations are an interface contract only and report the gap as
//! a configuration error until an EVM node protocol is wired in.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::adapters::chain_adapter::ChainAdapter;
use crate::domain::gateways::RpcEndpointRepository;
use crate::domain::models::block::Block;
use crate::domain::models::blockchain::{Blockchain, RpcEndpoint};
use crate::shared::errors::IngestError;

/// Adapter for a registered EVM-style network
pub struct EvmAdapter {
    blockchain: Blockchain,
    endpoints: Arc<dyn RpcEndpointRepository>,
}

impl EvmAdapter {
    #[must_use]
    pub fn new(blockchain: Blockchain, endpoints: Arc<dyn RpcEndpointRepository>) -> Self {
        Self {
            blockchain,
            endpoints,
        }
    }

    fn unimplemented(&self, operation: &str) -> IngestError {
        IngestError::Configuration(format!(
            "{operation} is not implemented for EVM chain {}",
            self.blockchain.chain_id()
        ))
    }
}

#[async_trait]
impl ChainAdapter for EvmAdapter {
    async fn remote_latest_height(&self) -> Result<i64, IngestError> {
        Err(self.unimplemented("remote_latest_height"))
    }

    async fn local_synced_height(&self) -> Result<Option<i64>, IngestError> {
        Err(self.unimplemented("local_synced_height"))
    }

    async fn block_at_height(
        &self,
        _height: i64,
        _include_transactions: bool,
    ) -> Result<Option<Block>, IngestError> {
        Err(self.unimplemented("block_at_height"))
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
        if height < 0 {
            return Err(IngestError::Validation(
                "Block height cannot be negative".to_string(),
            ));
        }
        Err(self.unimplemented("ingest_block"))
    }
}
