//! PostgreSQL repository implementations.
//!
//! Read-only implementations of the domain repository traits using SQLx.
//! The schema lives in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgSiteRepository`] - Sites and sitemap trees
//! - [`PgPageRepository`] - Pages by slug and start pages
//! - [`PgPostRepository`] - Posts, categories and tags
//! - [`PgAliasRepository`] - Alias lookups
//! - [`load_type_registry`] - Page and post types

pub mod pg_alias_repository;
pub mod pg_page_repository;
pub mod pg_post_repository;
pub mod pg_site_repository;
pub mod pg_type_registry;

pub use pg_alias_repository::PgAliasRepository;
pub use pg_page_repository::PgPageRepository;
pub use pg_post_repository::PgPostRepository;
pub use pg_site_repository::PgSiteRepository;
pub use pg_type_registry::load_type_registry;
