//! Application layer services.
//!
//! Services consume repository traits and provide a clean API for the routing
//! pipeline and the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::content_api::ContentApi`] - Read-through cached content lookups
//! - [`services::preview_service::PreviewService`] - Preview token authentication

pub mod services;
