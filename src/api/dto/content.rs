//! DTOs for the content endpoints the router dispatches to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Page, Post, is_published};
use crate::error::AppError;
use crate::routing::archive_router::ArchiveFilters;

/// Query parameters appended by the page and post routers.
///
/// Extra keys (the handled marker, the client's own parameters) are ignored.
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub id: Uuid,
    #[serde(default)]
    pub startpage: Option<bool>,
}

/// Query parameters appended by the archive router.
///
/// Every filter key is present but may be empty, so they are read as strings
/// and parsed by [`ArchiveQuery::filters`].
#[derive(Debug, Default, Deserialize)]
pub struct ArchiveQuery {
    pub id: Uuid,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub pagenum: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

fn parse_opt<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| {
            AppError::bad_request(
                format!("Invalid archive filter '{}'", name),
                json!({ "field": name, "value": v }),
            )
        }),
    }
}

impl ArchiveQuery {
    /// Parses the filter keys. `page` wins over `pagenum` when both are set.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for non-empty values that do not parse.
    pub fn filters(&self) -> Result<ArchiveFilters, AppError> {
        let page = match parse_opt::<u32>("page", self.page.as_deref())? {
            Some(page) => Some(page),
            None => parse_opt("pagenum", self.pagenum.as_deref())?,
        };

        Ok(ArchiveFilters {
            year: parse_opt("year", self.year.as_deref())?,
            month: parse_opt("month", self.month.as_deref())?,
            page,
            category: parse_opt("category", self.category.as_deref())?,
            tag: parse_opt("tag", self.tag.as_deref())?,
        })
    }
}

/// A page as served by `GET /page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto {
    pub id: Uuid,
    pub site_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub page_type: String,
    pub title: String,
    pub slug: String,
    pub permalink: String,
    pub published: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    pub is_published: bool,
    pub is_startpage: bool,
    /// Trailing path segments left over by the router.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_route: Option<String>,
}

impl PageDto {
    pub fn new(page: &Page, sub_route: Option<String>) -> Self {
        Self {
            id: page.id,
            site_id: page.site_id,
            parent_id: page.parent_id,
            page_type: page.page_type.clone(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            permalink: format!("/{}", page.slug),
            published: page.published,
            last_modified: page.last_modified,
            is_published: is_published(page.published, Utc::now()),
            is_startpage: page.is_startpage(),
            sub_route,
        }
    }
}

/// A post as served by `GET /post` and listed by `GET /archive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub post_type: String,
    pub title: String,
    pub slug: String,
    pub published: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_route: Option<String>,
}

impl PostDto {
    pub fn new(post: &Post, sub_route: Option<String>) -> Self {
        Self {
            id: post.id,
            blog_id: post.blog_id,
            post_type: post.post_type.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            published: post.published,
            last_modified: post.last_modified,
            is_published: is_published(post.published, Utc::now()),
            category_id: post.category_id,
            tag_ids: post.tag_ids.clone(),
            sub_route,
        }
    }
}

/// Filters echoed back by `GET /archive`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFiltersDto {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub page: Option<u32>,
    pub category: Option<Uuid>,
    pub tag: Option<Uuid>,
}

impl From<ArchiveFilters> for ArchiveFiltersDto {
    fn from(f: ArchiveFilters) -> Self {
        Self {
            year: f.year,
            month: f.month,
            page: f.page,
            category: f.category,
            tag: f.tag,
        }
    }
}

/// An archive page with one page of its posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveDto {
    pub archive: PageDto,
    pub filters: ArchiveFiltersDto,
    pub posts: Vec<PostDto>,
    pub current_page: u32,
    pub page_size: usize,
    pub total_posts: usize,
    pub total_pages: usize,
}
