//! Endpoint routes the routing middleware dispatches to.

use crate::api::handlers::{
    archive_handler, health_handler, page_handler, page_rest_handler, post_handler,
    post_rest_handler,
};
use crate::routing::{DEFAULT_ARCHIVE_ROUTE, DEFAULT_PAGE_ROUTE, DEFAULT_POST_ROUTE};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Content endpoints.
///
/// # Endpoints
///
/// - `GET /page`, `GET /page/{*rest}`  - Page by id
/// - `GET /post`, `GET /post/{*rest}`  - Post by id
/// - `GET /archive`                    - Archive page with filtered posts
/// - `GET /health`                     - Content store and cache health
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route(DEFAULT_PAGE_ROUTE, get(page_handler))
        .route(&format!("{}/{{*rest}}", DEFAULT_PAGE_ROUTE), get(page_rest_handler))
        .route(DEFAULT_POST_ROUTE, get(post_handler))
        .route(&format!("{}/{{*rest}}", DEFAULT_POST_ROUTE), get(post_rest_handler))
        .route(DEFAULT_ARCHIVE_ROUTE, get(archive_handler))
        .route("/health", get(health_handler))
}
