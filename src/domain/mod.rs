//! Domain Layer
//!
//! Contains the core business logic, domain models, and gateway traits (ports).
//! This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;

pub use gateways::{BlockStore, BlockchainRepository, ChainClient, RpcEndpointRepository};
pub use models::{Block, Blockchain, ChainKind, MegachainBlock, RpcEndpoint};
