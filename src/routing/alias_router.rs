//! Alias redirects.

use uuid::Uuid;

use super::RouterEnv;
use super::response::AliasResponse;
use crate::error::AppError;

/// Resolves literal old-URL aliases to redirects.
pub struct AliasRouter;

impl AliasRouter {
    /// Looks up the alias for `url` within `site_id`.
    ///
    /// The URL is normalized to a leading `/`. The site root never matches.
    ///
    /// # Errors
    ///
    /// Propagates content API errors.
    pub async fn invoke(
        env: &RouterEnv,
        url: &str,
        site_id: Uuid,
    ) -> Result<Option<AliasResponse>, AppError> {
        if url.trim_matches('/').is_empty() {
            return Ok(None);
        }

        let url = if url.starts_with('/') {
            url.to_string()
        } else {
            format!("/{}", url)
        };

        let alias = env.api.alias_by_url(&url, site_id).await?;

        Ok(alias.map(|alias| AliasResponse {
            redirect_url: alias.redirect_url,
            redirect_type: alias.redirect_type,
        }))
    }
}
