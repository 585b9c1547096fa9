//! Driving Adapters
//!
//! Entry points through which the outside world reaches the application.

pub mod api_rest;
