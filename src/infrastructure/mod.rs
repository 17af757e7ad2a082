//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for content storage and caching.
//!
//! # Modules
//!
//! - [`cache`] - Object cache abstractions (Redis and no-op implementations)
//! - [`memory`] - JSON seeded in-memory content store
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod memory;
pub mod persistence;
