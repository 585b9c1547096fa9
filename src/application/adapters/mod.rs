//! Chain Adapters
//!
//! One adapter per chain kind, all behind the uniform [`ChainAdapter`]
//! contract, plus the registry that resolves a `(kind, chain_id)` pair to a
//! configured adapter instance.

pub mod chain_adapter;
pub mod evm;
pub mod inflight;
pub mod megachain;
pub mod registry;

pub use chain_adapter::ChainAdapter;
pub use evm::EvmAdapter;
pub use inflight::InflightIngestions;
pub use megachain::MegachainAdapter;
pub use registry::AdapterRegistry;
