//! PostgreSQL RPC Endpoint Repository Implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::gateways::RpcEndpointRepository;
use crate::domain::models::blockchain::RpcEndpoint;
use crate::shared::errors::RepositoryError;

/// Database row representation for the rpc_urls table
#[derive(Debug, sqlx::FromRow)]
struct RpcUrlRow {
    id: i32,
    blockchain_id: i32,
    url: String,
}

impl From<RpcUrlRow> for RpcEndpoint {
    fn from(row: RpcUrlRow) -> Self {
        Self {
            id: row.id,
            blockchain_id: row.blockchain_id,
            url: row.url,
        }
    }
}

/// PostgreSQL implementation of `RpcEndpointRepository`
pub struct PostgresRpcEndpointRepository {
    pool: PgPool,
}

impl PostgresRpcEndpointRepository {
    /// Create a new `PostgresRpcEndpointRepository`
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RpcEndpointRepository for PostgresRpcEndpointRepository {
    async fn list(&self, blockchain_id: i32) -> Result<Vec<RpcEndpoint>, RepositoryError> {
        let rows = sqlx::query_as::<_, RpcUrlRow>(
            r#"
            SELECT id, blockchain_id, url
            FROM rpc_urls
            WHERE blockchain_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(blockchain_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RpcEndpoint::from).collect())
    }

    async fn add(&self, blockchain_id: i32, url: &str) -> Result<RpcEndpoint, RepositoryError> {
        // The unique (blockchain_id, url) constraint rejects duplicates; the
        // From<sqlx::Error> mapping turns that into a Conflict.
        let row = sqlx::query_as::<_, RpcUrlRow>(
            r#"
            INSERT INTO rpc_urls (blockchain_id, url)
            VALUES ($1, $2)
            RETURNING id, blockchain_id, url
            "#,
        )
        .bind(blockchain_id)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;

        Ok(RpcEndpoint::from(row))
    }
}
