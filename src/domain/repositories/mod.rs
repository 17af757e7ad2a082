//! Repository trait definitions for the domain layer.
//!
//! These are the data-access operations the routing core consumes. Lookups
//! return `Ok(None)` when nothing matches; errors are reserved for failures
//! of the backing store.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` (PostgreSQL)
//!   and `crate::infrastructure::memory` (JSON seeded, in-memory)
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`SiteRepository`] - Site lookup by hostname and sitemap loading
//! - [`PageRepository`] - Page lookup by slug and start page
//! - [`PostRepository`] - Post, category and tag lookup by slug within a blog
//! - [`AliasRepository`] - Alias lookup by URL within a site

pub mod alias_repository;
pub mod page_repository;
pub mod post_repository;
pub mod site_repository;

pub use alias_repository::AliasRepository;
pub use page_repository::PageRepository;
pub use post_repository::PostRepository;
pub use site_repository::SiteRepository;

#[cfg(test)]
pub use alias_repository::MockAliasRepository;
#[cfg(test)]
pub use page_repository::MockPageRepository;
#[cfg(test)]
pub use post_repository::MockPostRepository;
#[cfg(test)]
pub use site_repository::MockSiteRepository;
