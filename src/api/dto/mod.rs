//! Data Transfer Objects for the endpoints behind the router.
//!
//! All DTOs use Serde for JSON serialization and query string parsing.

pub mod content;
pub mod health;
