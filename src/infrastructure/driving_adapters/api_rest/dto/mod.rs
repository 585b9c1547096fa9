//! Data Transfer Objects

pub mod blockchain;

pub use blockchain::{
    AddRpcEndpointDto, ApiResponse, BlockDto, BlockchainDto, IngestBlockDto,
    RegisterBlockchainDto, RpcEndpointDto, TransactionDto,
};
