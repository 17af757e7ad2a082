//! PostgreSQL implementation of post repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Post, RedirectType, Taxonomy};
use crate::domain::repositories::PostRepository;
use crate::error::AppError;

const POST_COLUMNS: &str = "p.id, p.blog_id, p.post_type, p.title, p.slug, p.route, p.published, \
     p.last_modified, p.redirect_url, p.redirect_type, p.category_id, \
     ARRAY(SELECT t.tag_id FROM post_tags t WHERE t.post_id = p.id) AS tag_ids";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    blog_id: Uuid,
    post_type: String,
    title: String,
    slug: String,
    route: Option<String>,
    published: Option<DateTime<Utc>>,
    last_modified: DateTime<Utc>,
    redirect_url: Option<String>,
    redirect_type: String,
    category_id: Option<Uuid>,
    tag_ids: Vec<Uuid>,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Post {
            id: r.id,
            blog_id: r.blog_id,
            post_type: r.post_type,
            title: r.title,
            slug: r.slug,
            route: r.route,
            published: r.published,
            last_modified: r.last_modified,
            redirect_url: r.redirect_url,
            redirect_type: RedirectType::parse(&r.redirect_type),
            category_id: r.category_id,
            tag_ids: r.tag_ids,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaxonomyRow {
    id: Uuid,
    blog_id: Uuid,
    title: String,
    slug: String,
}

impl From<TaxonomyRow> for Taxonomy {
    fn from(r: TaxonomyRow) -> Self {
        Taxonomy {
            id: r.id,
            blog_id: r.blog_id,
            title: r.title,
            slug: r.slug,
        }
    }
}

/// PostgreSQL repository for posts and their taxonomies.
pub struct PgPostRepository {
    pool: Arc<PgPool>,
}

impl PgPostRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_taxonomy(
        &self,
        kind: &str,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError> {
        let row = sqlx::query_as::<_, TaxonomyRow>(
            r#"
            SELECT id, blog_id, title, slug
            FROM taxonomies
            WHERE kind = $1 AND blog_id = $2 AND slug = $3
            "#,
        )
        .bind(kind)
        .bind(blog_id)
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Taxonomy::from))
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_slug(&self, blog_id: Uuid, slug: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.blog_id = $1 AND p.slug = $2"
        ))
        .bind(blog_id)
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Post::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Post::from))
    }

    async fn list_by_blog(&self, blog_id: Uuid) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.blog_id = $1 \
             ORDER BY p.published DESC NULLS LAST, p.last_modified DESC"
        ))
        .bind(blog_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_category_by_slug(
        &self,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError> {
        self.find_taxonomy("category", blog_id, slug).await
    }

    async fn find_tag_by_slug(
        &self,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError> {
        self.find_taxonomy("tag", blog_id, slug).await
    }
}
