//! PostgreSQL implementation of alias repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Alias, RedirectType};
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct AliasRow {
    id: Uuid,
    site_id: Uuid,
    alias_url: String,
    redirect_url: String,
    redirect_type: String,
}

/// PostgreSQL repository for aliases.
///
/// `(site_id, alias_url)` is unique, so a lookup returns at most one row.
pub struct PgAliasRepository {
    pool: Arc<PgPool>,
}

impl PgAliasRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AliasRepository for PgAliasRepository {
    async fn find_by_alias_url(
        &self,
        alias_url: &str,
        site_id: Uuid,
    ) -> Result<Option<Alias>, AppError> {
        let row = sqlx::query_as::<_, AliasRow>(
            r#"
            SELECT id, site_id, alias_url, redirect_url, redirect_type
            FROM aliases
            WHERE site_id = $1 AND alias_url = $2
            "#,
        )
        .bind(site_id)
        .bind(alias_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| Alias {
            id: r.id,
            site_id: r.site_id,
            alias_url: r.alias_url,
            redirect_url: r.redirect_url,
            redirect_type: RedirectType::parse(&r.redirect_type),
        }))
    }
}
