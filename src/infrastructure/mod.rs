//! Infrastructure Layer
//!
//! Driven adapters (database, remote nodes, config) and driving adapters
//! (REST API) around the domain and application layers.

pub mod driven_adapters;
pub mod driving_adapters;
