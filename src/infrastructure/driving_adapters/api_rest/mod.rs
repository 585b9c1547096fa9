//! REST API Module
//!
//! Thin HTTP surface over the adapter registry: handlers map adapter results
//! onto the uniform `{success, data?, error?}` envelope and nothing more.

pub mod dto;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use crate::application::adapters::AdapterRegistry;
use crate::domain::gateways::BlockchainRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AdapterRegistry>,
    pub blockchains: Arc<dyn BlockchainRepository>,
}
