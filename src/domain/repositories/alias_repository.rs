//! Repository trait for aliases.

use crate::domain::entities::Alias;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Read access to URL aliases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasRepository: Send + Sync {
    /// Finds the alias with exactly this URL in the given site.
    ///
    /// `alias_url` is expected to start with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_alias_url(
        &self,
        alias_url: &str,
        site_id: Uuid,
    ) -> Result<Option<Alias>, AppError>;
}
