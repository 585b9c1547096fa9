//! Blockchain Repository Gateway
//!
//! Contract for the blockchain-registration store backing the adapter
//! registry.

use async_trait::async_trait;

use crate::domain::models::blockchain::{Blockchain, ChainKind, RegisterBlockchainData};
use crate::shared::errors::RepositoryError;

/// Repository trait for blockchain registrations
#[async_trait]
pub trait BlockchainRepository: Send + Sync {
    /// Find a registration by its `(kind, chain_id)` pair
    async fn find_by_kind_and_chain_id(
        &self,
        kind: ChainKind,
        chain_id: &str,
    ) -> Result<Option<Blockchain>, RepositoryError>;

    /// List every registration, sorted by id ascending
    async fn find_all(&self) -> Result<Vec<Blockchain>, RepositoryError>;

    /// Register a new blockchain.
    ///
    /// Fails with [`RepositoryError::Conflict`] when `(kind, chain_id)` is
    /// already registered.
    async fn create(&self, data: &RegisterBlockchainData) -> Result<Blockchain, RepositoryError>;
}
