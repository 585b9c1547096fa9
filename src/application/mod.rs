//! Application Layer
//!
//! Contains the chain adapters and their registry, which orchestrate the
//! fetch, validate and persist pipeline over the domain gateways.

pub mod adapters;
