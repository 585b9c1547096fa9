//! Common test utilities for e2e tests
//!
//! Provides test infrastructure for spinning up a PostgreSQL container,
//! running migrations, stubbing a remote chain node and creating a test
//! application.

use std::sync::Arc;

use axum::Router;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tower_http::trace::TraceLayer;
use wiremock::MockServer;

use multichain_block_ingestor::application::adapters::AdapterRegistry;
use multichain_block_ingestor::infrastructure::driven_adapters::config::AppConfig;
use multichain_block_ingestor::infrastructure::driven_adapters::{
    HttpChainClient, PostgresBlockStore, PostgresBlockchainRepository,
    PostgresRpcEndpointRepository,
};
use multichain_block_ingestor::infrastructure::driving_adapters::api_rest::handlers::{
    blockchains, status,
};
use multichain_block_ingestor::infrastructure::driving_adapters::api_rest::AppState;

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    /// Stub for the remote chain node endpoints talk to
    pub chain_node: MockServer,
    _container: ContainerAsync<Postgres>,
}

impl TestApp {
    /// Create a new test application with a fresh PostgreSQL database
    pub async fn new() -> Self {
        // Start PostgreSQL container
        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

        // Create connection pool
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        // Stub remote chain node
        let chain_node = MockServer::start().await;

        // Create driven adapters
        let blockchain_repository = Arc::new(PostgresBlockchainRepository::new(pool.clone()));
        let endpoint_repository = Arc::new(PostgresRpcEndpointRepository::new(pool.clone()));
        let block_store = Arc::new(PostgresBlockStore::new(pool.clone()));
        let chain_client = Arc::new(HttpChainClient::new());

        let config = create_test_config(&database_url);
        let registry = Arc::new(AdapterRegistry::new(
            blockchain_repository.clone(),
            endpoint_repository,
            block_store,
            chain_client,
            config.ingestion.max_fetch_attempts,
        ));

        // Create application state
        let app_state = AppState {
            registry,
            blockchains: blockchain_repository,
        };

        // Build router
        let router = Router::new()
            .nest("/blockchains", blockchains::router())
            .nest("/status", status::router())
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        Self {
            router,
            pool,
            chain_node,
            _container: container,
        }
    }

    /// Count rows in a table
    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

/// Create a test configuration
fn create_test_config(database_url: &str) -> AppConfig {
    use config::{Config, File, FileFormat};

    let config_str = format!(
        r#"
[server]
host = "127.0.0.1"
port = 0

[database]
url = "{database_url}"
max_connections = 5
min_connections = 1

[ingestion]
max_fetch_attempts = 3
"#
    );

    Config::builder()
        .add_source(File::from_str(&config_str, FileFormat::Toml))
        .build()
        .expect("Failed to build test config")
        .try_deserialize()
        .expect("Failed to deserialize test config")
}

/// Build a witness blob carrying one real signature over `rid`.
///
/// Returns the hex-encoded blob and the signer's hex-encoded public key.
pub fn signed_witness_hex(rid: &[u8; 32]) -> (String, String) {
    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(&[0x42; 32]).expect("valid secret key bytes");
    let public_key = PublicKey::from_secret_key(&secp, &secret);
    let signature = secp.sign_ecdsa(&Message::from_digest(*rid), &secret);

    let pub_key = public_key.serialize();
    let sig = signature.serialize_compact();
    let mut blob = Vec::new();
    blob.extend_from_slice(&1u32.to_be_bytes());
    blob.extend_from_slice(&(pub_key.len() as u32).to_be_bytes());
    blob.extend_from_slice(&pub_key);
    blob.extend_from_slice(&(sig.len() as u32).to_be_bytes());
    blob.extend_from_slice(&sig);

    (hex::encode(blob), hex::encode(pub_key))
}

/// Megachain block payload with a correctly signed witness
pub fn valid_block_payload(rid: [u8; 32], height: i64) -> serde_json::Value {
    let (witness, pub_key) = signed_witness_hex(&rid);
    json!({
        "rid": hex::encode(rid),
        "prevBlockRID": hex::encode([0xbb; 32]),
        "witness": witness,
        "blockNumber": height,
        "height": height,
        "timestamp": 1_700_000_000,
        "transactions": [{ "id": format!("tx-{height}"), "hash": "deadbeef" }],
        "witnesses": [pub_key]
    })
}

/// Megachain block payload whose witness signs a different rid
pub fn invalid_witness_payload(rid: [u8; 32], height: i64) -> serde_json::Value {
    let mut other_rid = rid;
    other_rid[0] ^= 0xff;
    let (witness, pub_key) = signed_witness_hex(&other_rid);
    json!({
        "rid": hex::encode(rid),
        "prevBlockRID": hex::encode([0xbb; 32]),
        "witness": witness,
        "height": height,
        "timestamp": 1_700_000_000,
        "transactions": [],
        "witnesses": [pub_key]
    })
}
