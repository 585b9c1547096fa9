//! PostgreSQL Blockchain Repository Implementation
//!
//! Implements the `BlockchainRepository` trait using SQLx for PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::gateways::BlockchainRepository;
use crate::domain::models::blockchain::{Blockchain, ChainKind, RegisterBlockchainData};
use crate::shared::errors::RepositoryError;

/// Database row representation for the blockchains table
#[derive(Debug, sqlx::FromRow)]
struct BlockchainRow {
    id: i32,
    #[sqlx(rename = "type")]
    kind: String,
    name: String,
    chain_id: String,
}

impl TryFrom<BlockchainRow> for Blockchain {
    type Error = RepositoryError;

    fn try_from(row: BlockchainRow) -> Result<Self, Self::Error> {
        let kind: ChainKind = row
            .kind
            .parse()
            .map_err(|err: crate::domain::models::blockchain::UnsupportedChainKind| {
                RepositoryError::Mapping(err.to_string())
            })?;
        Ok(Blockchain::restore(row.id, kind, row.name, row.chain_id))
    }
}

/// PostgreSQL implementation of `BlockchainRepository`
pub struct PostgresBlockchainRepository {
    pool: PgPool,
}

impl PostgresBlockchainRepository {
    /// Create a new `PostgresBlockchainRepository`
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockchainRepository for PostgresBlockchainRepository {
    async fn find_by_kind_and_chain_id(
        &self,
        kind: ChainKind,
        chain_id: &str,
    ) -> Result<Option<Blockchain>, RepositoryError> {
        let row = sqlx::query_as::<_, BlockchainRow>(
            r#"
            SELECT id, type, name, chain_id
            FROM blockchains
            WHERE type = $1 AND chain_id = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(chain_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Blockchain::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Blockchain>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlockchainRow>(
            r#"
            SELECT id, type, name, chain_id
            FROM blockchains
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Blockchain::try_from).collect()
    }

    async fn create(&self, data: &RegisterBlockchainData) -> Result<Blockchain, RepositoryError> {
        let row = sqlx::query_as::<_, BlockchainRow>(
            r#"
            INSERT INTO blockchains (type, name, chain_id)
            VALUES ($1, $2, $3)
            RETURNING id, type, name, chain_id
            "#,
        )
        .bind(data.kind.as_str())
        .bind(&data.name)
        .bind(&data.chain_id)
        .fetch_one(&self.pool)
        .await?;

        Blockchain::try_from(row)
    }
}
