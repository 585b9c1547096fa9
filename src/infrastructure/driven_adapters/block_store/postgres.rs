//! PostgreSQL Block Store Implementation
//!
//! Persists a Megachain block together with its witnesses and transactions
//! in one database transaction: every row commits or none do.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::gateways::BlockStore;
use crate::domain::models::block::{MegachainBlock, MegachainTransaction};
use crate::domain::models::witness::Witness;
use crate::shared::errors::RepositoryError;

/// Database row representation for the megachain_blocks table
#[derive(Debug, sqlx::FromRow)]
struct MegachainBlockRow {
    id: i32,
    chain_id: String,
    rid: Vec<u8>,
    prev_block_rid: Vec<u8>,
    height: i64,
    timestamp: i64,
    witness: Vec<u8>,
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    block_hash: String,
}

/// PostgreSQL implementation of `BlockStore`
pub struct PostgresBlockStore {
    pool: PgPool,
}

impl PostgresBlockStore {
    /// Create a new `PostgresBlockStore`
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockStore for PostgresBlockStore {
    async fn insert_megachain_block(&self, block: &MegachainBlock) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // The owning registration is resolved by (chain_id, type); a missing
        // registration fails the insert and aborts the transaction.
        sqlx::query(
            r#"
            INSERT INTO megachain_blocks (blockchain_id, rid, prev_block_rid, height, timestamp, witness)
            VALUES (
                (SELECT id FROM blockchains WHERE chain_id = $1 AND type = 'megachain'),
                $2, $3, $4, $5, $6
            )
            "#,
        )
        .bind(&block.chain_id)
        .bind(&block.rid)
        .bind(&block.prev_block_rid)
        .bind(block.height)
        .bind(block.timestamp)
        .bind(&block.witness)
        .execute(&mut *tx)
        .await?;

        // Witness and transaction rows are linked by re-querying the block
        // through its unique rid rather than an in-memory identifier.
        for witness in &block.witnesses {
            sqlx::query(
                r#"
                INSERT INTO megachain_witnesses (block_id, pub_key)
                VALUES ((SELECT id FROM megachain_blocks WHERE rid = $1), $2)
                "#,
            )
            .bind(&block.rid)
            .bind(&witness.public_key)
            .execute(&mut *tx)
            .await?;
        }

        for transaction in &block.transactions {
            sqlx::query(
                r#"
                INSERT INTO megachain_transactions (id, block_id, block_hash)
                VALUES ($1, (SELECT id FROM megachain_blocks WHERE rid = $2), $3)
                "#,
            )
            .bind(&transaction.id)
            .bind(&block.rid)
            .bind(&transaction.hash)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_height(
        &self,
        blockchain_id: i32,
        height: i64,
        include_transactions: bool,
    ) -> Result<Option<MegachainBlock>, RepositoryError> {
        // The (blockchain_id, height, rid) constraint permits two rids at
        // one height; reads always pick the earliest inserted row.
        let row = sqlx::query_as::<_, MegachainBlockRow>(
            r#"
            SELECT b.id, c.chain_id, b.rid, b.prev_block_rid, b.height, b.timestamp, b.witness
            FROM megachain_blocks b
            JOIN blockchains c ON c.id = b.blockchain_id
            WHERE b.blockchain_id = $1 AND b.height = $2
            ORDER BY b.id ASC
            LIMIT 1
            "#,
        )
        .bind(blockchain_id)
        .bind(height)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let witnesses = sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT pub_key FROM megachain_witnesses
            WHERE block_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|public_key| Witness { public_key })
        .collect();

        let transactions = if include_transactions {
            sqlx::query_as::<_, TransactionRow>(
                r#"
                SELECT id, block_hash FROM megachain_transactions
                WHERE block_id = $1
                ORDER BY id ASC
                "#,
            )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|tx| MegachainTransaction {
                id: tx.id,
                hash: tx.block_hash,
            })
            .collect()
        } else {
            Vec::new()
        };

        Ok(Some(MegachainBlock {
            chain_id: row.chain_id,
            height: row.height,
            timestamp: row.timestamp,
            rid: row.rid,
            prev_block_rid: row.prev_block_rid,
            witness: row.witness,
            transactions,
            witnesses,
        }))
    }

    async fn max_height(&self, blockchain_id: i32) -> Result<Option<i64>, RepositoryError> {
        let height = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT MAX(height) FROM megachain_blocks WHERE blockchain_id = $1
            "#,
        )
        .bind(blockchain_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(height)
    }
}
