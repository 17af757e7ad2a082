//! JSON seeded implementation of all content repositories.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::domain::content_types::{PageType, PostType, TypeRegistry};
use crate::domain::entities::{Alias, Page, Post, Site, SitemapItem, Taxonomy, build_sitemap};
use crate::domain::repositories::{
    AliasRepository, PageRepository, PostRepository, SiteRepository,
};
use crate::error::AppError;

/// The seed document loaded by [`MemoryContentStore`].
///
/// ```json
/// {
///   "page_types": [{ "id": "BlogArchive", "is_archive": true }],
///   "sites": [{ "id": "…", "title": "Main", "hostnames": "example.com", "is_default": true,
///               "last_modified": "2024-01-01T00:00:00Z" }],
///   "pages": [], "posts": [], "categories": [], "tags": [], "aliases": []
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSeed {
    pub page_types: Vec<PageType>,
    pub post_types: Vec<PostType>,
    pub sites: Vec<Site>,
    pub pages: Vec<Page>,
    pub posts: Vec<Post>,
    pub categories: Vec<Taxonomy>,
    pub tags: Vec<Taxonomy>,
    pub aliases: Vec<Alias>,
}

impl ContentSeed {
    /// Builds the type registry declared by the seed.
    pub fn type_registry(&self) -> TypeRegistry {
        TypeRegistry::from_types(self.page_types.clone(), self.post_types.clone())
    }
}

/// Read-only content store backed by a [`ContentSeed`].
///
/// The data set is small and immutable once loaded, so lookups are linear
/// scans without any locking.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    seed: ContentSeed,
}

impl MemoryContentStore {
    pub fn new(seed: ContentSeed) -> Self {
        Self { seed }
    }

    /// Loads a seed document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid seed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read content file {}", path.display()))?;
        let seed: ContentSeed = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid content file {}", path.display()))?;

        tracing::info!(
            sites = seed.sites.len(),
            pages = seed.pages.len(),
            posts = seed.posts.len(),
            aliases = seed.aliases.len(),
            "Loaded content file"
        );

        Ok(Self::new(seed))
    }

    pub fn seed(&self) -> &ContentSeed {
        &self.seed
    }
}

#[async_trait]
impl SiteRepository for MemoryContentStore {
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Site>, AppError> {
        Ok(self
            .seed
            .sites
            .iter()
            .find(|s| s.matches_hostname(hostname))
            .cloned())
    }

    async fn get_default(&self) -> Result<Option<Site>, AppError> {
        Ok(self.seed.sites.iter().find(|s| s.is_default).cloned())
    }

    async fn get_sitemap(&self, site_id: Uuid) -> Result<Vec<SitemapItem>, AppError> {
        let pages: Vec<Page> = self
            .seed
            .pages
            .iter()
            .filter(|p| p.site_id == site_id)
            .cloned()
            .collect();
        Ok(build_sitemap(&pages))
    }
}

#[async_trait]
impl PageRepository for MemoryContentStore {
    async fn find_by_slug(&self, slug: &str, site_id: Uuid) -> Result<Option<Page>, AppError> {
        Ok(self
            .seed
            .pages
            .iter()
            .find(|p| p.site_id == site_id && p.slug == slug)
            .cloned())
    }

    async fn get_startpage(&self, site_id: Uuid) -> Result<Option<Page>, AppError> {
        Ok(self
            .seed
            .pages
            .iter()
            .find(|p| p.site_id == site_id && p.is_startpage())
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, AppError> {
        Ok(self.seed.pages.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl PostRepository for MemoryContentStore {
    async fn find_by_slug(&self, blog_id: Uuid, slug: &str) -> Result<Option<Post>, AppError> {
        Ok(self
            .seed
            .posts
            .iter()
            .find(|p| p.blog_id == blog_id && p.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        Ok(self.seed.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_blog(&self, blog_id: Uuid) -> Result<Vec<Post>, AppError> {
        let mut posts: Vec<Post> = self
            .seed
            .posts
            .iter()
            .filter(|p| p.blog_id == blog_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published.cmp(&a.published));
        Ok(posts)
    }

    async fn find_category_by_slug(
        &self,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError> {
        Ok(self
            .seed
            .categories
            .iter()
            .find(|c| c.blog_id == blog_id && c.slug == slug)
            .cloned())
    }

    async fn find_tag_by_slug(
        &self,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError> {
        Ok(self
            .seed
            .tags
            .iter()
            .find(|t| t.blog_id == blog_id && t.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl AliasRepository for MemoryContentStore {
    async fn find_by_alias_url(
        &self,
        alias_url: &str,
        site_id: Uuid,
    ) -> Result<Option<Alias>, AppError> {
        Ok(self
            .seed
            .aliases
            .iter()
            .find(|a| a.site_id == site_id && a.alias_url == alias_url)
            .cloned())
    }
}
