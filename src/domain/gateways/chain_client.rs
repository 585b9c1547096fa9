//! Chain Client Gateway
//!
//! Contract for talking to a remote chain node. Implementations speak the
//! node's HTTP API; callers receive raw JSON that the block factory decodes
//! into typed entities.

use async_trait::async_trait;

use crate::shared::errors::IngestError;

/// Client trait for fetching chain data from a single remote endpoint
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Fetch the raw block payload at a height:
    /// `GET {endpoint}/blocks/{chain_id}/height/{height}`.
    ///
    /// A network failure or non-success response is a [`IngestError::Fetch`];
    /// a response body that is not JSON is a [`IngestError::Format`].
    async fn fetch_block(
        &self,
        endpoint: &str,
        chain_id: &str,
        height: i64,
    ) -> Result<serde_json::Value, IngestError>;

    /// Fetch the latest height the node knows about:
    /// `GET {endpoint}/blocks/{chain_id}?limit=1`, taking the first
    /// element's height.
    async fn fetch_latest_height(
        &self,
        endpoint: &str,
        chain_id: &str,
    ) -> Result<i64, IngestError>;
}
