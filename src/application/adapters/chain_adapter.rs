//! Uniform Chain Adapter Contract
//!
//! Every chain kind implements the same ingestion interface. Operations
//! resolve to success data or a typed [`IngestError`]; nothing panics or
//! escapes past this boundary, and nothing is retried above it.

use async_trait::async_trait;

use crate::domain::models::block::Block;
use crate::domain::models::blockchain::RpcEndpoint;
use crate::shared::errors::IngestError;

/// Uniform ingestion contract implemented per chain kind
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Latest height known to the remote network
    async fn remote_latest_height(&self) -> Result<i64, IngestError>;

    /// Highest height already persisted for this chain, `None` when no block
    /// has been ingested yet
    async fn local_synced_height(&self) -> Result<Option<i64>, IngestError>;

    /// Load a persisted block by height, loading its transaction list only
    /// when `include_transactions` is set
    async fn block_at_height(
        &self,
        height: i64,
        include_transactions: bool,
    ) -> Result<Option<Block>, IngestError>;

    /// List the RPC endpoints registered for this chain
    async fn rpc_endpoints(&self) -> Result<Vec<RpcEndpoint>, IngestError>;

    /// Register a new RPC endpoint.
    ///
    /// Registering a duplicate URL fails with [`IngestError::Conflict`] and
    /// leaves the endpoint set unchanged.
    async fn register_rpc_endpoint(&self, url: &str) -> Result<RpcEndpoint, IngestError>;

    /// Run the full fetch, validate and persist pipeline for one height and
    /// return the persisted block
    async fn ingest_block(&self, height: i64) -> Result<Block, IngestError>;
}
