//! HTTP layer behind the router.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for responses and query strings
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Preview authentication and tracing middleware
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
