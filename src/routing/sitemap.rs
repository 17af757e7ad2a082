//! `sitemap.xml` rendering.

use askama::Template;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use uuid::Uuid;

use super::RouterEnv;
use crate::domain::entities::{SitemapItem, is_published};
use crate::error::AppError;

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: String,
}

impl SitemapUrl {
    fn new(base_url: &str, permalink: &str, last_modified: DateTime<Utc>) -> Self {
        Self {
            loc: format!("{}{}", base_url.trim_end_matches('/'), permalink),
            lastmod: last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Renders `templates/sitemap.xml`.
#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub urls: Vec<SitemapUrl>,
}

/// Collects the public URLs of a site: every published page of the tree and
/// the published posts of its archive pages.
///
/// An unpublished page hides its whole subtree.
///
/// # Errors
///
/// Propagates content API errors.
pub async fn collect_urls(
    env: &RouterEnv,
    site_id: Uuid,
    base_url: &str,
) -> Result<Vec<SitemapUrl>, AppError> {
    let now = Utc::now();
    let tree = env.api.sitemap(site_id).await?;

    let mut pages = Vec::new();
    walk(&tree, now, &mut pages);

    let mut urls = Vec::with_capacity(pages.len());
    for item in pages {
        urls.push(SitemapUrl::new(base_url, &item.permalink, item.last_modified));

        if env.types.is_archive(&item.page_type) {
            for post in env.api.posts_by_blog(item.id).await? {
                if is_published(post.published, now) {
                    // Posts route under the archive slug even when the
                    // archive is the start page.
                    let permalink = format!("/{}/{}", item.slug, post.slug);
                    urls.push(SitemapUrl::new(base_url, &permalink, post.last_modified));
                }
            }
        }
    }

    Ok(urls)
}

fn walk<'a>(items: &'a [SitemapItem], now: DateTime<Utc>, out: &mut Vec<&'a SitemapItem>) {
    for item in items {
        if is_published(item.published, now) {
            out.push(item);
            walk(&item.items, now, out);
        }
    }
}

/// Renders the sitemap document of a site.
///
/// # Errors
///
/// Propagates content API errors; template failures are internal errors.
pub async fn render(env: &RouterEnv, site_id: Uuid, base_url: &str) -> Result<String, AppError> {
    let urls = collect_urls(env, site_id, base_url).await?;
    SitemapTemplate { urls }.render().map_err(|e| {
        AppError::internal("Sitemap rendering failed", json!({ "reason": e.to_string() }))
    })
}
