//! Block Store Implementations

pub mod postgres;

pub use postgres::PostgresBlockStore;
