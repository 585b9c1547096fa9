//! HTTP Handlers

pub mod blockchains;
pub mod status;
