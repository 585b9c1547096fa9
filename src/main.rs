//! Multi-Chain Block Ingestor - Main Entry Point

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multichain_block_ingestor::application::adapters::AdapterRegistry;
use multichain_block_ingestor::infrastructure::driven_adapters::database::create_pool;
use multichain_block_ingestor::infrastructure::driven_adapters::{
    AppConfig, HttpChainClient, PostgresBlockStore, PostgresBlockchainRepository,
    PostgresRpcEndpointRepository,
};
use multichain_block_ingestor::infrastructure::driving_adapters::api_rest::handlers::{
    blockchains, status,
};
use multichain_block_ingestor::infrastructure::driving_adapters::api_rest::middleware::request_id::request_id_middleware;
use multichain_block_ingestor::infrastructure::driving_adapters::api_rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multichain_block_ingestor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create driven adapters
    let blockchain_repository = Arc::new(PostgresBlockchainRepository::new(pool.clone()));
    let endpoint_repository = Arc::new(PostgresRpcEndpointRepository::new(pool.clone()));
    let block_store = Arc::new(PostgresBlockStore::new(pool));
    let chain_client = Arc::new(HttpChainClient::new());

    // Create the adapter registry
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
    let app = Router::new()
        .nest("/blockchains", blockchains::router())
        .nest("/status", status::router())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
