//! Chain Client Implementations

pub mod http;

pub use http::HttpChainClient;
