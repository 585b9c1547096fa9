//! Gateway Traits (Ports)
//!
//! Abstract interfaces defining contracts for external dependencies.
//! These are implemented by driven adapters in the infrastructure layer.

pub mod block_store;
pub mod blockchain_repository;
pub mod chain_client;
pub mod rpc_endpoint_repository;

pub use block_store::BlockStore;
pub use blockchain_repository::BlockchainRepository;
pub use chain_client::ChainClient;
pub use rpc_endpoint_repository::RpcEndpointRepository;
