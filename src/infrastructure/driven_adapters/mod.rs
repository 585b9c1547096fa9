//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Database repositories and the block store
//! - Remote chain node client
//! - Configuration

pub mod block_store;
pub mod blockchain_repository;
pub mod chain_client;
pub mod config;
pub mod database;
pub mod rpc_endpoint_repository;

pub use block_store::PostgresBlockStore;
pub use blockchain_repository::PostgresBlockchainRepository;
pub use chain_client::HttpChainClient;
pub use config::AppConfig;
pub use rpc_endpoint_repository::PostgresRpcEndpointRepository;
