//! RPC Endpoint Repository Gateway

use async_trait::async_trait;

use crate::domain::models::blockchain::RpcEndpoint;
use crate::shared::errors::RepositoryError;

/// Repository trait for a chain's registered RPC endpoints.
///
/// The endpoint set is append-only; rows disappear only through the cascading
/// delete of the owning registration.
#[async_trait]
pub trait RpcEndpointRepository: Send + Sync {
    /// List the endpoints registered for a blockchain, in registration order
    async fn list(&self, blockchain_id: i32) -> Result<Vec<RpcEndpoint>, RepositoryError>;

    /// Register a new endpoint URL.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the URL is already
    /// registered for this blockchain, leaving the set unchanged.
    async fn add(&self, blockchain_id: i32, url: &str) -> Result<RpcEndpoint, RepositoryError>;
}
