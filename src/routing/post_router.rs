//! Post routes.

use chrono::Utc;
use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

use super::http_cache::HttpCacheInfo;
use super::response::{RouteResponse, RouteTarget};
use super::slug_matcher::{match_slug, match_slug_until};
use super::{
    DEFAULT_POST_ROUTE, DraftAccess, HANDLED_KEY, RouterEnv, append_segments, split_segments,
};
use crate::domain::entities::is_published;
use crate::error::AppError;

/// Resolves `/<blog slug>/<post slug>[/rest]` to posts.
pub struct PostRouter;

impl PostRouter {
    /// Finds the blog with the longest slug that leaves at least one segment,
    /// then the longest post slug inside it.
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
        if segments.len() < 2 {
            return Ok(None);
        }

        let api = env.api.as_ref();
        let types = env.types.as_ref();

        let blog = match_slug_until(&segments, 0, segments.len() - 1, |slug| async move {
            let page = drafts.visible_page(api.page_by_slug(&slug, site_id).await?);
            Ok(page.filter(|p| types.is_archive(&p.page_type)))
        })
        .await?;

        let Some(blog) = blog else {
            return Ok(None);
        };
        let blog_id = blog.item.id;

        let post = match_slug(&segments, blog.consumed, |slug| async move {
            Ok(drafts.visible_post(api.post_by_slug(blog_id, &slug).await?))
        })
        .await?;

        let Some(found) = post else {
            debug!(blog = %blog_id, "No post matched in blog");
            return Ok(None);
        };
        let post = found.item;

        let base = post
            .route
            .clone()
            .or_else(|| types.post_type(&post.post_type).and_then(|t| t.route.clone()))
            .unwrap_or_else(|| DEFAULT_POST_ROUTE.to_string());

        let query_string = form_urlencoded::Serializer::new(String::new())
            .append_pair("id", &post.id.to_string())
            .append_pair(HANDLED_KEY, "true")
            .finish();

        Ok(Some(RouteResponse {
            target: RouteTarget::Post(post.id),
            route: append_segments(&base, &segments[found.consumed..]),
            query_string,
            redirect_url: post.redirect_url.clone().filter(|u| !u.trim().is_empty()),
            redirect_type: post.redirect_type,
            is_published: is_published(post.published, Utc::now()),
            cache_info: Some(HttpCacheInfo::for_content(post.id, post.last_modified)),
        }))
    }
}
