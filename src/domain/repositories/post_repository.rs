//! Repository trait for posts and their taxonomies.

use crate::domain::entities::{Post, Taxonomy};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Read access to posts, categories and tags. Everything is scoped to a blog
/// (an archive page).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Finds a post by slug within a blog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_slug(&self, blog_id: Uuid, slug: &str) -> Result<Option<Post>, AppError>;

    /// Finds a post by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, AppError>;

    /// Lists the posts of a blog, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_by_blog(&self, blog_id: Uuid) -> Result<Vec<Post>, AppError>;

    /// Finds a category by slug within a blog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_category_by_slug(
        &self,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError>;

    /// Finds a tag by slug within a blog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_tag_by_slug(&self, blog_id: Uuid, slug: &str)
    -> Result<Option<Taxonomy>, AppError>;
}
