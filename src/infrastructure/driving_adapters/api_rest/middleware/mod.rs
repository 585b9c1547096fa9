//! HTTP Middleware

pub mod request_id;
