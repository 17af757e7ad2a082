//! Content lookups with a read-through object cache.

use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::entities::{Alias, Page, Post, Site, SitemapItem, Taxonomy};
use crate::domain::repositories::{
    AliasRepository, PageRepository, PostRepository, SiteRepository,
};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// The content API the routing core reads from.
///
/// Every lookup first consults the object cache and falls back to the
/// repository on a miss, a cache error or an undecodable entry. Successful
/// repository hits are written back in a detached task. Negative results are
/// never cached, so newly created content becomes routable without waiting for
/// an entry to expire.
#[derive(Clone)]
pub struct ContentApi {
    sites: Arc<dyn SiteRepository>,
    pages: Arc<dyn PageRepository>,
    posts: Arc<dyn PostRepository>,
    aliases: Arc<dyn AliasRepository>,
    cache: Arc<dyn CacheService>,
}

impl ContentApi {
    /// Creates a new content API over the given repositories and cache.
    pub fn new(
        sites: Arc<dyn SiteRepository>,
        pages: Arc<dyn PageRepository>,
        posts: Arc<dyn PostRepository>,
        aliases: Arc<dyn AliasRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            sites,
            pages,
            posts,
            aliases,
            cache,
        }
    }

    /// Creates a content API where one store serves every repository.
    pub fn from_store<S>(store: Arc<S>, cache: Arc<dyn CacheService>) -> Self
    where
        S: SiteRepository + PageRepository + PostRepository + AliasRepository + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store, cache)
    }

    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }

    /// Finds the site bound to `hostname` (optionally with a path prefix).
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn site_by_hostname(&self, hostname: &str) -> Result<Option<Site>, AppError> {
        let key = format!("site:host:{}", hostname.to_ascii_lowercase());
        self.read_through(key, || self.sites.find_by_hostname(hostname))
            .await
    }

    /// Returns the default site.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn default_site(&self) -> Result<Option<Site>, AppError> {
        self.read_through("site:default".to_string(), || self.sites.get_default())
            .await
    }

    /// Loads the page tree of a site.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn sitemap(&self, site_id: Uuid) -> Result<Vec<SitemapItem>, AppError> {
        let key = format!("sitemap:{}", site_id);
        let items = self
            .read_through(key, || async {
                self.sites.get_sitemap(site_id).await.map(Some)
            })
            .await?;
        Ok(items.unwrap_or_default())
    }

    /// Finds a page by slug within a site.
    ///
    /// A slug the page repository does not know is looked up as a permalink in
    /// the site's page tree before giving up.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn page_by_slug(&self, slug: &str, site_id: Uuid) -> Result<Option<Page>, AppError> {
        let key = format!("page:slug:{}:{}", site_id, slug);
        if let Some(page) = self
            .read_through(key, || self.pages.find_by_slug(slug, site_id))
            .await?
        {
            return Ok(Some(page));
        }
        self.page_by_permalink(slug, site_id).await
    }

    async fn page_by_permalink(&self, slug: &str, site_id: Uuid) -> Result<Option<Page>, AppError> {
        let permalink = format!("/{}", slug.trim_matches('/'));
        let tree = self.sitemap(site_id).await?;
        let Some(item) = tree
            .iter()
            .find_map(|item| item.find_by_permalink(&permalink))
        else {
            return Ok(None);
        };

        debug!(page = %item.id, %permalink, "Resolved slug through sitemap");
        Ok(self
            .page_by_id(item.id)
            .await?
            .filter(|page| page.site_id == site_id))
    }

    /// Returns the start page of a site.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn startpage(&self, site_id: Uuid) -> Result<Option<Page>, AppError> {
        let key = format!("page:start:{}", site_id);
        self.read_through(key, || self.pages.get_startpage(site_id))
            .await
    }

    /// Finds a page by id.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn page_by_id(&self, id: Uuid) -> Result<Option<Page>, AppError> {
        self.read_through(format!("page:id:{}", id), || self.pages.find_by_id(id))
            .await
    }

    /// Finds a post by slug within a blog.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn post_by_slug(&self, blog_id: Uuid, slug: &str) -> Result<Option<Post>, AppError> {
        let key = format!("post:slug:{}:{}", blog_id, slug);
        self.read_through(key, || self.posts.find_by_slug(blog_id, slug))
            .await
    }

    /// Finds a post by id.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        self.read_through(format!("post:id:{}", id), || self.posts.find_by_id(id))
            .await
    }

    /// Lists the posts of a blog. Not cached.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn posts_by_blog(&self, blog_id: Uuid) -> Result<Vec<Post>, AppError> {
        self.posts.list_by_blog(blog_id).await
    }

    /// Finds a category by slug within a blog.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn category_by_slug(
        &self,
        blog_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, AppError> {
        let key = format!("category:{}:{}", blog_id, slug);
        self.read_through(key, || self.posts.find_category_by_slug(blog_id, slug))
            .await
    }

    /// Finds a tag by slug within a blog.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn tag_by_slug(&self, blog_id: Uuid, slug: &str) -> Result<Option<Taxonomy>, AppError> {
        let key = format!("tag:{}:{}", blog_id, slug);
        self.read_through(key, || self.posts.find_tag_by_slug(blog_id, slug))
            .await
    }

    /// Finds an alias by exact URL within a site.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn alias_by_url(&self, url: &str, site_id: Uuid) -> Result<Option<Alias>, AppError> {
        let key = format!("alias:{}:{}", site_id, url);
        self.read_through(key, || self.aliases.find_by_alias_url(url, site_id))
            .await
    }

    /// Reports whether the cache backend answers.
    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    /// Reports whether the content store answers, by asking for the default site.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn store_check(&self) -> Result<Option<Site>, AppError> {
        self.sites.get_default().await
    }

    async fn read_through<T, F, Fut>(&self, key: String, load: F) -> Result<Option<T>, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, AppError>>,
    {
        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!("Cache HIT for {}", key);
                    return Ok(Some(value));
                }
                Err(e) => warn!("Discarding undecodable cache entry {}: {}", key, e),
            },
            Ok(None) => debug!("Cache MISS for {}", key),
            Err(e) => error!("Cache error: {}", e),
        }

        let value = load().await?;

        if let Some(found) = &value {
            match serde_json::to_string(found) {
                Ok(raw) => {
                    // Fire-and-forget write back
                    let cache = self.cache.clone();
                    tokio::spawn(async move {
                        if let Err(e) = cache.set(&key, &raw, None).await {
                            error!("Failed to cache {}: {}", key, e);
                        }
                    });
                }
                Err(e) => warn!("Failed to encode {} for cache: {}", key, e),
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        MockAliasRepository, MockPageRepository, MockPostRepository, MockSiteRepository,
    };
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use chrono::Utc;
    use serde_json::json;

    fn test_site() -> Site {
        Site {
            id: Uuid::new_v4(),
            title: "Main".to_string(),
            hostnames: Some("example.com".to_string()),
            culture: Some("en-US".to_string()),
            is_default: true,
            last_modified: Utc::now(),
        }
    }

    fn api(sites: MockSiteRepository, cache: MockCacheService) -> ContentApi {
        ContentApi::new(
            Arc::new(sites),
            Arc::new(MockPageRepository::new()),
            Arc::new(MockPostRepository::new()),
            Arc::new(MockAliasRepository::new()),
            Arc::new(cache),
        )
    }

    #[tokio::test]
    async fn test_cache_hit_skips_repository() {
        let site = test_site();
        let raw = serde_json::to_string(&site).unwrap();

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .withf(|key| key == "site:host:example.com")
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));

        let mut sites = MockSiteRepository::new();
        sites.expect_find_by_hostname().times(0);

        let result = api(sites, cache).site_by_hostname("Example.com").await;

        assert_eq!(result.unwrap(), Some(site));
    }

    #[tokio::test]
    async fn test_cache_miss_falls_back_to_repository() {
        let site = test_site();
        let expected = site.clone();

        let mut cache = MockCacheService::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        cache.expect_set().returning(|_, _, _| Ok(()));

        let mut sites = MockSiteRepository::new();
        sites
            .expect_find_by_hostname()
            .withf(|host| host == "example.com")
            .times(1)
            .returning(move |_| Ok(Some(site.clone())));

        let result = api(sites, cache).site_by_hostname("example.com").await;

        assert_eq!(result.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_cache_error_falls_back_to_repository() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));

        let mut sites = MockSiteRepository::new();
        sites.expect_get_default().times(1).returning(|| Ok(None));

        let result = api(sites, cache).default_site().await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_ignored() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("not json".to_string())));

        let mut sites = MockSiteRepository::new();
        sites.expect_get_default().times(1).returning(|| Ok(None));

        let result = api(sites, cache).default_site().await;

        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_repository_error_propagates() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));

        let mut sites = MockSiteRepository::new();
        sites
            .expect_get_default()
            .times(1)
            .returning(|| Err(AppError::internal("Database error", json!({}))));

        let result = api(sites, cache).default_site().await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    fn sitemap_fixture(site_id: Uuid) -> (Page, Vec<SitemapItem>) {
        let page = Page {
            id: Uuid::new_v4(),
            site_id,
            parent_id: None,
            sort_order: 1,
            page_type: "StandardPage".to_string(),
            title: "About".to_string(),
            slug: "about-us".to_string(),
            route: None,
            published: Some(Utc::now()),
            last_modified: Utc::now(),
            redirect_url: None,
            redirect_type: Default::default(),
        };
        let tree = vec![SitemapItem {
            id: page.id,
            parent_id: None,
            title: page.title.clone(),
            slug: "about".to_string(),
            permalink: "/about".to_string(),
            route: None,
            page_type: page.page_type.clone(),
            published: page.published,
            last_modified: page.last_modified,
            items: vec![],
        }];
        (page, tree)
    }

    fn uncached() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().returning(|_, _, _| Ok(()));
        cache
    }

    fn slug_api(sites: MockSiteRepository, pages: MockPageRepository) -> ContentApi {
        ContentApi::new(
            Arc::new(sites),
            Arc::new(pages),
            Arc::new(MockPostRepository::new()),
            Arc::new(MockAliasRepository::new()),
            Arc::new(uncached()),
        )
    }

    #[tokio::test]
    async fn test_slug_miss_falls_back_to_sitemap() {
        let site_id = Uuid::new_v4();
        let (page, tree) = sitemap_fixture(site_id);
        let expected = page.clone();

        let mut pages = MockPageRepository::new();
        pages
            .expect_find_by_slug()
            .withf(|slug, _| slug == "about")
            .times(1)
            .returning(|_, _| Ok(None));
        pages
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(page.clone())));

        let mut sites = MockSiteRepository::new();
        sites
            .expect_get_sitemap()
            .times(1)
            .returning(move |_| Ok(tree.clone()));

        let result = slug_api(sites, pages).page_by_slug("about", site_id).await;

        assert_eq!(result.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_slug_hit_skips_sitemap() {
        let site_id = Uuid::new_v4();
        let (page, _) = sitemap_fixture(site_id);
        let expected = page.clone();

        let mut pages = MockPageRepository::new();
        pages
            .expect_find_by_slug()
            .times(1)
            .returning(move |_, _| Ok(Some(page.clone())));

        let mut sites = MockSiteRepository::new();
        sites.expect_get_sitemap().times(0);

        let result = slug_api(sites, pages).page_by_slug("about-us", site_id).await;

        assert_eq!(result.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_sitemap_fallback_misses_unknown_permalink() {
        let site_id = Uuid::new_v4();
        let (_, tree) = sitemap_fixture(site_id);

        let mut pages = MockPageRepository::new();
        pages.expect_find_by_slug().returning(|_, _| Ok(None));
        pages.expect_find_by_id().times(0);

        let mut sites = MockSiteRepository::new();
        sites
            .expect_get_sitemap()
            .returning(move |_| Ok(tree.clone()));

        let result = slug_api(sites, pages).page_by_slug("contact", site_id).await;

        assert!(result.unwrap().is_none());
    }
}
