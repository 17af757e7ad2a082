//! HTTP middleware for request processing.
//!
//! Provides preview authentication and observability middleware. The routing
//! middleware itself lives in [`crate::pipeline::layer`].

pub mod auth;
pub mod tracing;
