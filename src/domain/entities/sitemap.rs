//! Sitemap tree node.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Page;

/// A node in the page tree of a site.
///
/// `permalink` is the public URL of the page (`/about/team`, or `/` for the
/// start page), `slug` the path the routers match it by, `route` the internal
/// route it dispatches to, if it overrides the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapItem {
    pub id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub permalink: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub page_type: String,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<SitemapItem>,
}

impl SitemapItem {
    /// Finds the node whose permalink equals `permalink`.
    pub fn find_by_permalink(&self, permalink: &str) -> Option<&SitemapItem> {
        if self.permalink == permalink {
            return Some(self);
        }
        self.items
            .iter()
            .find_map(|item| item.find_by_permalink(permalink))
    }
}

/// Builds the page tree of a site from a flat page list.
///
/// Siblings are ordered by `sort_order`. The start page's permalink is the site
/// root `/`. Pages whose parent is not in the list
/// are treated as roots so an inconsistent tree still renders.
pub fn build_sitemap(pages: &[Page]) -> Vec<SitemapItem> {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by_key(|p| p.sort_order);

    let known: std::collections::HashSet<Uuid> = pages.iter().map(|p| p.id).collect();
    let roots = sorted
        .iter()
        .filter(|p| p.parent_id.is_none_or(|parent| !known.contains(&parent)))
        .copied()
        .collect::<Vec<_>>();

    roots
        .into_iter()
        .map(|page| build_node(page, &sorted))
        .collect()
}

fn build_node(page: &Page, pages: &[&Page]) -> SitemapItem {
    let items = pages
        .iter()
        .filter(|p| p.parent_id == Some(page.id))
        .map(|child| build_node(child, pages))
        .collect();

    SitemapItem {
        id: page.id,
        parent_id: page.parent_id,
        title: page.title.clone(),
        slug: page.slug.clone(),
        permalink: if page.is_startpage() {
            "/".to_string()
        } else {
            format!("/{}", page.slug)
        },
        route: page.route.clone(),
        page_type: page.page_type.clone(),
        published: page.published,
        last_modified: page.last_modified,
        items,
    }
}
