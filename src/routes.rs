//! Top-level router combining the routing middleware and the content endpoints.
//!
//! # Request Flow
//!
//! ```text
//! TraceLayer -> preview auth -> routing pipeline -> endpoint routing
//! ```
//!
//! The routing pipeline rewrites public URLs (`/blog/my-post`) to internal
//! routes (`/post?id=...`). It is applied to a router whose only job is to
//! forward to the endpoints through `fallback_service`, so endpoint matching
//! sees the rewritten URI.

use crate::api;
use crate::api::middleware::{auth, tracing};
use crate::pipeline::layer;
use crate::state::AppState;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let endpoints = api::routes::content_routes().with_state(state.clone());

    Router::new()
        .fallback_service(endpoints)
        .layer(middleware::from_fn_with_state(state.clone(), layer::rewrite))
        .layer(middleware::from_fn_with_state(state, auth::layer))
        .layer(tracing::layer())
}
