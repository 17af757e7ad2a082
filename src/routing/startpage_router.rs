//! Start page route.

use tracing::debug;
use uuid::Uuid;

use super::archive_router::{ArchiveFilters, archive_response};
use super::page_router::page_response;
use super::response::RouteResponse;
use super::{DraftAccess, RouterEnv};
use crate::error::AppError;

/// Resolves root requests to the site's start page.
pub struct StartPageRouter;

impl StartPageRouter {
    /// Only `""` and `"/"` are start page requests. An archive start page
    /// routes as an unfiltered archive.
    ///
    /// # Errors
    ///
    /// Propagates content API errors.
    pub async fn invoke(
        env: &RouterEnv,
        url: &str,
        site_id: Uuid,
        drafts: DraftAccess,
    ) -> Result<Option<RouteResponse>, AppError> {
        if !url.is_empty() && url != "/" {
            return Ok(None);
        }

        let Some(page) = drafts.visible_page(env.api.startpage(site_id).await?) else {
            debug!(site = %site_id, "Site has no start page");
            return Ok(None);
        };

        if env.types.is_archive(&page.page_type) {
            return Ok(Some(archive_response(
                env,
                &page,
                &ArchiveFilters::default(),
                true,
            )));
        }

        Ok(Some(page_response(env, &page, &[])))
    }
}
