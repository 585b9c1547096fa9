//! Blockchain Repository Implementations

pub mod postgres;

pub use postgres::PostgresBlockchainRepository;
