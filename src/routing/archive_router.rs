//! Archive routes.
//!
//! An archive page lists the posts of a blog. Everything after its slug is
//! read as filters:
//!
//! ```text
//! /<archive> [ category <slug> | tag <slug> ] [ <year> [ <month> ] ] [ page <n> ]
//! ```

use chrono::{Datelike, Utc};
use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

use super::http_cache::HttpCacheInfo;
use super::response::{RouteResponse, RouteTarget};
use super::slug_matcher::match_slug;
use super::{DEFAULT_ARCHIVE_ROUTE, DraftAccess, HANDLED_KEY, RouterEnv, split_segments};
use crate::domain::entities::{Page, is_published};
use crate::error::AppError;

/// Filters parsed from an archive sub-path.
///
/// `category` and `tag` hold the nil UUID when the slug was present but did
/// not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveFilters {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub page: Option<u32>,
    pub category: Option<Uuid>,
    pub tag: Option<Uuid>,
}

/// Resolves archive pages and their filter segments.
pub struct ArchiveRouter;

impl ArchiveRouter {
    /// Matches the longest page slug; the page must be an archive.
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
        if !env.types.is_archive(&found.item.page_type) {
            return Ok(None);
        }

        let filters = parse_filters(env, found.item.id, &segments[found.consumed..]).await?;
        debug!(archive = %found.item.id, ?filters, "Matched archive");

        Ok(Some(archive_response(env, &found.item, &filters, false)))
    }
}

/// Reads filter segments in grammar order.
async fn parse_filters(
    env: &RouterEnv,
    blog_id: Uuid,
    rest: &[String],
) -> Result<ArchiveFilters, AppError> {
    let current_year = Utc::now().year();
    let mut filters = ArchiveFilters::default();
    let mut i = 0;

    while i < rest.len() {
        let segment = rest[i].as_str();
        let next = rest.get(i + 1);
        let untouched = filters.category.is_none()
            && filters.tag.is_none()
            && filters.year.is_none();

        match (segment, next) {
            ("category", Some(slug)) if untouched => {
                let category = env.api.category_by_slug(blog_id, slug).await?;
                filters.category = Some(category.map_or(Uuid::nil(), |c| c.id));
                i += 2;
                continue;
            }
            ("tag", Some(slug)) if untouched => {
                let tag = env.api.tag_by_slug(blog_id, slug).await?;
                filters.tag = Some(tag.map_or(Uuid::nil(), |t| t.id));
                i += 2;
                continue;
            }
            ("page", Some(n)) => {
                if let Ok(n) = n.parse::<u32>() {
                    filters.page = Some(n);
                    break;
                }
            }
            _ if filters.year.is_none() && is_digits(segment, 4..=4) => {
                if let Ok(year) = segment.parse::<i32>() {
                    filters.year = Some(year.min(current_year));
                }
            }
            _ if filters.year.is_some()
                && filters.month.is_none()
                && is_digits(segment, 1..=2) =>
            {
                if let Ok(month) = segment.parse::<u32>() {
                    filters.month = Some(month.clamp(1, 12));
                }
            }
            _ => {}
        }
        i += 1;
    }

    Ok(filters)
}

/// A year is exactly four ASCII digits, a month one or two.
fn is_digits(segment: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&segment.len()) && segment.bytes().all(|b| b.is_ascii_digit())
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Builds the route of an archive page with the given filters. Every filter
/// key is present in the query string, empty when unset.
pub(crate) fn archive_response(
    env: &RouterEnv,
    page: &Page,
    filters: &ArchiveFilters,
    startpage: bool,
) -> RouteResponse {
    let route = page
        .route
        .clone()
        .or_else(|| {
            env.types
                .page_type(&page.page_type)
                .and_then(|t| t.route.clone())
        })
        .unwrap_or_else(|| DEFAULT_ARCHIVE_ROUTE.to_string());

    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("id", &page.id.to_string())
        .append_pair("year", &opt(filters.year))
        .append_pair("month", &opt(filters.month))
        .append_pair("page", &opt(filters.page))
        .append_pair("pagenum", &opt(filters.page))
        .append_pair("category", &opt(filters.category))
        .append_pair("tag", &opt(filters.tag));
    if startpage {
        query.append_pair("startpage", "true");
    }
    let query_string = query.append_pair(HANDLED_KEY, "true").finish();

    RouteResponse {
        target: RouteTarget::Page(page.id),
        route,
        query_string,
        redirect_url: page.redirect_url.clone().filter(|u| !u.trim().is_empty()),
        redirect_type: page.redirect_type,
        is_published: is_published(page.published, Utc::now()),
        cache_info: Some(HttpCacheInfo::for_content(page.id, page.last_modified)),
    }
}
