//! Page routes.

use chrono::Utc;
use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

use super::http_cache::HttpCacheInfo;
use super::response::{RouteResponse, RouteTarget};
use super::slug_matcher::match_slug;
use super::{
    DEFAULT_PAGE_ROUTE, DraftAccess, HANDLED_KEY, RouterEnv, append_segments, split_segments,
};
use crate::domain::entities::{Page, is_published};
use crate::error::AppError;

/// Resolves request paths to pages of a site.
pub struct PageRouter;

impl PageRouter {
    /// Finds the page with the longest slug that prefixes `url`.
    ///
    /// Archive pages with trailing segments are left alone: those segments
    /// address a post or archive filters and belong to the post and archive
    /// routers. An archive page addressed exactly is also left to the archive
    /// router so its listing gets filter parameters. Drafts outside `drafts`
    /// do not match.
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
        let segments = split_segments(url);
        if segments.is_empty() {
            return Ok(None);
        }

        let api = env.api.as_ref();
        let found = match_slug(&segments, 0, |slug| async move {
            Ok(drafts.visible_page(api.page_by_slug(&slug, site_id).await?))
        })
        .await?;

        let Some(found) = found else {
            return Ok(None);
        };

        if env.types.is_archive(&found.item.page_type) {
            debug!(page = %found.item.id, "Matched archive page, deferring");
            return Ok(None);
        }

        Ok(Some(page_response(
            env,
            &found.item,
            &segments[found.consumed..],
        )))
    }
}

/// Builds the route for a non-archive page.
pub(crate) fn page_response(env: &RouterEnv, page: &Page, rest: &[String]) -> RouteResponse {
    let base = page
        .route
        .clone()
        .or_else(|| {
            env.types
                .page_type(&page.page_type)
                .and_then(|t| t.route.clone())
        })
        .unwrap_or_else(|| DEFAULT_PAGE_ROUTE.to_string());

    let query_string = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", &page.id.to_string())
        .append_pair("startpage", if page.is_startpage() { "true" } else { "false" })
        .append_pair(HANDLED_KEY, "true")
        .finish();

    RouteResponse {
        target: RouteTarget::Page(page.id),
        route: append_segments(&base, rest),
        query_string,
        redirect_url: page.redirect_url.clone().filter(|u| !u.trim().is_empty()),
        redirect_type: page.redirect_type,
        is_published: is_published(page.published, Utc::now()),
        cache_info: Some(HttpCacheInfo::for_content(page.id, page.last_modified)),
    }
}
