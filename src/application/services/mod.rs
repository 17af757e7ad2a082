//! Business logic services for the application layer.

pub mod content_api;
pub mod preview_service;

pub use content_api::ContentApi;
pub use preview_service::PreviewService;
