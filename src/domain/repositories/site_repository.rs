//! Repository trait for sites.

use crate::domain::entities::{Site, SitemapItem};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Read access to sites and their page trees.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSiteRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryContentStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Finds the site bound to `hostname`.
    ///
    /// `hostname` may carry a path prefix (`example.com/en`). Matching is
    /// case-insensitive against each entry of the site's hostname list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Site>, AppError>;

    /// Returns the default site, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_default(&self) -> Result<Option<Site>, AppError>;

    /// Loads the page tree of a site, ordered by sort order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_sitemap(&self, site_id: Uuid) -> Result<Vec<SitemapItem>, AppError>;
}
