//! Handlers for the internal content routes.
//!
//! The routing middleware rewrites public URLs to these routes, so requests
//! reaching them carry the content id and the router's query parameters.

use axum::{
    Json,
    extract::{Extension, Path, Query, State, rejection::QueryRejection},
};
use chrono::{Datelike, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::api::dto::content::{
    ArchiveDto, ArchiveQuery, ContentQuery, PageDto, PostDto,
};
use crate::domain::entities::{Post, is_published};
use crate::error::AppError;
use crate::pipeline::context::{Claim, CurrentSite, Principal};
use crate::routing::archive_router::ArchiveFilters;
use crate::state::AppState;

/// Posts per archive page.
pub const ARCHIVE_PAGE_SIZE: usize = 10;

fn query<T: DeserializeOwned>(q: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    q.map(|Query(q)| q).map_err(|e| {
        AppError::bad_request("Invalid query parameters", json!({ "reason": e.body_text() }))
    })
}

fn principal(p: Option<Extension<Principal>>) -> Principal {
    p.map(|Extension(p)| p).unwrap_or_default()
}

fn not_found(kind: &str, id: Uuid) -> AppError {
    AppError::not_found(format!("{} not found", kind), json!({ "id": id }))
}

/// Content of another site is reported as missing. Without a resolved site
/// (no default site configured) nothing is filtered.
fn same_site(current: Option<&Extension<CurrentSite>>, site_id: Uuid) -> bool {
    current.is_none_or(|Extension(current)| current.site.id == site_id)
}

/// Returns a page.
///
/// # Endpoint
///
/// `GET /page?id=<uuid>` and `GET /page/{*rest}?id=<uuid>`
///
/// # Errors
///
/// - `400 Bad Request` when `id` is missing or malformed
/// - `404 Not Found` when the page does not exist, or is unpublished and the
///   caller lacks the page preview claim
pub async fn page_handler(
    State(st): State<AppState>,
    principal_ext: Option<Extension<Principal>>,
    site: Option<Extension<CurrentSite>>,
    q: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<PageDto>, AppError> {
    render_page(&st, principal(principal_ext), site, query(q)?, None).await
}

pub async fn page_rest_handler(
    State(st): State<AppState>,
    Path(rest): Path<String>,
    principal_ext: Option<Extension<Principal>>,
    site: Option<Extension<CurrentSite>>,
    q: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<PageDto>, AppError> {
    render_page(&st, principal(principal_ext), site, query(q)?, Some(rest)).await
}

async fn render_page(
    st: &AppState,
    principal: Principal,
    site: Option<Extension<CurrentSite>>,
    q: ContentQuery,
    sub_route: Option<String>,
) -> Result<Json<PageDto>, AppError> {
    let page = st
        .content
        .page_by_id(q.id)
        .await?
        .filter(|page| same_site(site.as_ref(), page.site_id))
        .ok_or_else(|| not_found("Page", q.id))?;

    if !is_published(page.published, Utc::now()) && !principal.has_claim(Claim::PagePreview) {
        return Err(not_found("Page", q.id));
    }

    let mut dto = PageDto::new(&page, sub_route);
    if let Some(startpage) = q.startpage {
        dto.is_startpage = startpage;
    }
    Ok(Json(dto))
}

/// Returns a post.
///
/// # Endpoint
///
/// `GET /post?id=<uuid>` and `GET /post/{*rest}?id=<uuid>`
///
/// # Errors
///
/// - `400 Bad Request` when `id` is missing or malformed
/// - `404 Not Found` when the post does not exist, or is unpublished and the
///   caller lacks the post preview claim
pub async fn post_handler(
    State(st): State<AppState>,
    principal_ext: Option<Extension<Principal>>,
    site: Option<Extension<CurrentSite>>,
    q: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<PostDto>, AppError> {
    render_post(&st, principal(principal_ext), site, query(q)?, None).await
}

pub async fn post_rest_handler(
    State(st): State<AppState>,
    Path(rest): Path<String>,
    principal_ext: Option<Extension<Principal>>,
    site: Option<Extension<CurrentSite>>,
    q: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<PostDto>, AppError> {
    render_post(&st, principal(principal_ext), site, query(q)?, Some(rest)).await
}

async fn render_post(
    st: &AppState,
    principal: Principal,
    site: Option<Extension<CurrentSite>>,
    q: ContentQuery,
    sub_route: Option<String>,
) -> Result<Json<PostDto>, AppError> {
    let post = st
        .content
        .post_by_id(q.id)
        .await?
        .ok_or_else(|| not_found("Post", q.id))?;

    let blog = st.content.page_by_id(post.blog_id).await?;
    if !blog.is_some_and(|blog| same_site(site.as_ref(), blog.site_id)) {
        return Err(not_found("Post", q.id));
    }

    if !is_published(post.published, Utc::now()) && !principal.has_claim(Claim::PostPreview) {
        return Err(not_found("Post", q.id));
    }

    Ok(Json(PostDto::new(&post, sub_route)))
}

/// Returns an archive page with one page of its filtered posts.
///
/// # Endpoint
///
/// `GET /archive?id=<uuid>&year=&month=&page=&pagenum=&category=&tag=`
///
/// Unpublished posts are listed only for callers with the post preview claim.
/// A nil category or tag matches no post.
///
/// # Errors
///
/// - `400 Bad Request` for malformed parameters
/// - `404 Not Found` when the archive does not exist, or is unpublished and
///   the caller lacks the page preview claim
pub async fn archive_handler(
    State(st): State<AppState>,
    principal_ext: Option<Extension<Principal>>,
    site: Option<Extension<CurrentSite>>,
    q: Result<Query<ArchiveQuery>, QueryRejection>,
) -> Result<Json<ArchiveDto>, AppError> {
    let principal = principal(principal_ext);
    let q = query(q)?;
    let filters = q.filters()?;

    let archive = st
        .content
        .page_by_id(q.id)
        .await?
        .filter(|archive| same_site(site.as_ref(), archive.site_id))
        .ok_or_else(|| not_found("Archive", q.id))?;

    let now = Utc::now();
    if !is_published(archive.published, now) && !principal.has_claim(Claim::PagePreview) {
        return Err(not_found("Archive", q.id));
    }

    let show_drafts = principal.has_claim(Claim::PostPreview);
    let posts: Vec<Post> = st
        .content
        .posts_by_blog(archive.id)
        .await?
        .into_iter()
        .filter(|p| show_drafts || is_published(p.published, now))
        .filter(|p| matches_filters(p, &filters))
        .collect();

    let total_posts = posts.len();
    let total_pages = total_posts.div_ceil(ARCHIVE_PAGE_SIZE);
    let current_page = filters.page.unwrap_or(1).max(1);
    let skip = (current_page as usize - 1) * ARCHIVE_PAGE_SIZE;

    Ok(Json(ArchiveDto {
        archive: PageDto::new(&archive, None),
        filters: filters.into(),
        posts: posts
            .iter()
            .skip(skip)
            .take(ARCHIVE_PAGE_SIZE)
            .map(|p| PostDto::new(p, None))
            .collect(),
        current_page,
        page_size: ARCHIVE_PAGE_SIZE,
        total_posts,
        total_pages,
    }))
}

fn matches_filters(post: &Post, filters: &ArchiveFilters) -> bool {
    if let Some(category) = filters.category
        && post.category_id != Some(category)
    {
        return false;
    }
    if let Some(tag) = filters.tag
        && !post.tag_ids.contains(&tag)
    {
        return false;
    }
    if filters.year.is_some() || filters.month.is_some() {
        let Some(published) = post.published else {
            return false;
        };
        if filters.year.is_some_and(|y| published.year() != y) {
            return false;
        }
        if filters.month.is_some_and(|m| published.month() != m) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RedirectType;
    use chrono::TimeZone;

    fn post(published: (i32, u32), category_id: Option<Uuid>, tag_ids: Vec<Uuid>) -> Post {
        Post {
            id: Uuid::new_v4(),
            blog_id: Uuid::new_v4(),
            post_type: "StandardPost".to_string(),
            title: "Post".to_string(),
            slug: "post".to_string(),
            route: None,
            published: Some(
                Utc.with_ymd_and_hms(published.0, published.1, 10, 8, 0, 0)
                    .unwrap(),
            ),
            last_modified: Utc::now(),
            redirect_url: None,
            redirect_type: RedirectType::Permanent,
            category_id,
            tag_ids,
        }
    }

    #[test]
    fn test_no_filters_match_everything() {
        assert!(matches_filters(&post((2018, 2), None, vec![]), &ArchiveFilters::default()));
    }

    #[test]
    fn test_date_filters() {
        let p = post((2018, 2), None, vec![]);
        let year = ArchiveFilters {
            year: Some(2018),
            ..Default::default()
        };
        let other_month = ArchiveFilters {
            year: Some(2018),
            month: Some(3),
            ..Default::default()
        };

        assert!(matches_filters(&p, &year));
        assert!(!matches_filters(&p, &other_month));
    }

    #[test]
    fn test_taxonomy_filters() {
        let category = Uuid::new_v4();
        let tag = Uuid::new_v4();
        let p = post((2018, 2), Some(category), vec![tag]);

        assert!(matches_filters(
            &p,
            &ArchiveFilters {
                category: Some(category),
                tag: Some(tag),
                ..Default::default()
            }
        ));
        assert!(!matches_filters(
            &p,
            &ArchiveFilters {
                category: Some(Uuid::nil()),
                ..Default::default()
            }
        ));
    }
}
