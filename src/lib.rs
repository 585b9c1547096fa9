//! Multi-Chain Block Ingestor
//!
//! A Rust-based backend for registering blockchain networks, fetching blocks
//! from their nodes, validating block witnesses and persisting the results,
//! following Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
