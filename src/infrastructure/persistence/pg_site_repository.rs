//! PostgreSQL implementation of site repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::pg_page_repository::{PAGE_COLUMNS, PageRow};
use crate::domain::entities::{Page, Site, SitemapItem, build_sitemap};
use crate::domain::repositories::SiteRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct SiteRow {
    id: Uuid,
    title: String,
    hostnames: Option<String>,
    culture: Option<String>,
    is_default: bool,
    last_modified: DateTime<Utc>,
}

impl From<SiteRow> for Site {
    fn from(r: SiteRow) -> Self {
        Site {
            id: r.id,
            title: r.title,
            hostnames: r.hostnames,
            culture: r.culture,
            is_default: r.is_default,
            last_modified: r.last_modified,
        }
    }
}

/// PostgreSQL repository for sites.
///
/// Hostname bindings are stored as a comma separated list, so matching happens
/// in memory over the sites that have bindings at all.
pub struct PgSiteRepository {
    pool: Arc<PgPool>,
}

impl PgSiteRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteRepository for PgSiteRepository {
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Site>, AppError> {
        let rows = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, title, hostnames, culture, is_default, last_modified
            FROM sites
            WHERE hostnames IS NOT NULL
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(Site::from)
            .find(|site| site.matches_hostname(hostname)))
    }

    async fn get_default(&self) -> Result<Option<Site>, AppError> {
        let row = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, title, hostnames, culture, is_default, last_modified
            FROM sites
            WHERE is_default = TRUE
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Site::from))
    }

    async fn get_sitemap(&self, site_id: Uuid) -> Result<Vec<SitemapItem>, AppError> {
        let rows = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE site_id = $1 ORDER BY sort_order"
        ))
        .bind(site_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let pages: Vec<Page> = rows.into_iter().map(Page::from).collect();
        Ok(build_sitemap(&pages))
    }
}
