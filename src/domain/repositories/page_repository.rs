//! Repository trait for pages.

use crate::domain::entities::Page;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Read access to pages.
///
/// Drafts are returned like published pages; publish gating is the router's
/// job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Finds a page by its full slug (`about/team`) within a site.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_slug(&self, slug: &str, site_id: Uuid) -> Result<Option<Page>, AppError>;

    /// Returns the start page of a site: no parent, sort order 0.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_startpage(&self, site_id: Uuid) -> Result<Option<Page>, AppError>;

    /// Finds a page by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, AppError>;
}
