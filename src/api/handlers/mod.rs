//! HTTP request handlers for the endpoints behind the router.

pub mod content;
pub mod health;

pub use content::{
    archive_handler, page_handler, page_rest_handler, post_handler, post_rest_handler,
};
pub use health::health_handler;
