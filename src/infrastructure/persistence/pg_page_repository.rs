//! PostgreSQL implementation of page repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Page, RedirectType};
use crate::domain::repositories::PageRepository;
use crate::error::AppError;

pub(super) const PAGE_COLUMNS: &str = "id, site_id, parent_id, sort_order, page_type, title, slug, \
     route, published, last_modified, redirect_url, redirect_type";

#[derive(sqlx::FromRow)]
pub(super) struct PageRow {
    id: Uuid,
    site_id: Uuid,
    parent_id: Option<Uuid>,
    sort_order: i32,
    page_type: String,
    title: String,
    slug: String,
    route: Option<String>,
    published: Option<DateTime<Utc>>,
    last_modified: DateTime<Utc>,
    redirect_url: Option<String>,
    redirect_type: String,
}

impl From<PageRow> for Page {
    fn from(r: PageRow) -> Self {
        Page {
            id: r.id,
            site_id: r.site_id,
            parent_id: r.parent_id,
            sort_order: r.sort_order,
            page_type: r.page_type,
            title: r.title,
            slug: r.slug,
            route: r.route,
            published: r.published,
            last_modified: r.last_modified,
            redirect_url: r.redirect_url,
            redirect_type: RedirectType::parse(&r.redirect_type),
        }
    }
}

/// PostgreSQL repository for pages.
pub struct PgPageRepository {
    pool: Arc<PgPool>,
}

impl PgPageRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageRepository for PgPageRepository {
    async fn find_by_slug(&self, slug: &str, site_id: Uuid) -> Result<Option<Page>, AppError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE site_id = $1 AND slug = $2"
        ))
        .bind(site_id)
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Page::from))
    }

    async fn get_startpage(&self, site_id: Uuid) -> Result<Option<Page>, AppError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages \
             WHERE site_id = $1 AND parent_id IS NULL AND sort_order = 0 \
             LIMIT 1"
        ))
        .bind(site_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Page::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, AppError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Page::from))
    }
}
