//! Block Store Gateway
//!
//! Contract for the atomic block persistence step.

use async_trait::async_trait;

use crate::domain::models::block::MegachainBlock;
use crate::shared::errors::RepositoryError;

/// Store trait for persisted Megachain blocks
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Persist a block together with its witnesses and transactions as one
    /// atomic unit: either every row commits or none do.
    ///
    /// The owning registration is resolved by the block's `(chain_id, type)`;
    /// witness and transaction rows are linked by re-querying the block row
    /// via its unique rid.
    ///
    /// Fails with [`RepositoryError::Conflict`] when a block with the same
    /// `(blockchain, height, rid)` is already stored.
    async fn insert_megachain_block(&self, block: &MegachainBlock) -> Result<(), RepositoryError>;

    /// Load a persisted block by height, loading its transaction list only
    /// when asked for.
    async fn find_by_height(
        &self,
        blockchain_id: i32,
        height: i64,
        include_transactions: bool,
    ) -> Result<Option<MegachainBlock>, RepositoryError>;

    /// Highest height persisted for a blockchain, `None` when nothing is
    /// stored yet.
    async fn max_height(&self, blockchain_id: i32) -> Result<Option<i64>, RepositoryError>;
}
