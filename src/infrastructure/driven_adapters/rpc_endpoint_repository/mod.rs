//! RPC Endpoint Repository Implementations

pub mod postgres;

pub use postgres::PostgresRpcEndpointRepository;
