//! Domain layer: content entities, content types and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Sites, pages, posts, aliases and sitemap nodes
//! - [`content_types`] - Explicitly constructed registry of page/post types
//! - [`repositories`] - Data access trait definitions consumed by the router
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - The routing core only reads entities; it never mutates them

pub mod content_types;
pub mod entities;
pub mod repositories;
