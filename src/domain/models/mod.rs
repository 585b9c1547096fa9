//! Domain Models
//!
//! Pure domain entities and value objects representing business concepts.

pub mod block;
pub mod blockchain;
pub mod payload;
pub mod witness;

pub use block::{Block, EvmBlock, MegachainBlock, MegachainTransaction, Transaction};
pub use blockchain::{Blockchain, ChainKind, RegisterBlockchainData, RpcEndpoint};
pub use witness::Witness;
