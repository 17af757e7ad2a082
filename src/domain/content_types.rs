//! Registry of page and post types.
//!
//! Built once at startup and shared with the routers through
//! [`crate::state::AppState`]. The router needs two things from a type: whether
//! a page type lists posts ([`PageType::is_archive`]) and the default route
//! for content of that type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A page type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageType {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Default route for pages of this type.
    #[serde(default)]
    pub route: Option<String>,
    /// Archive pages list the posts of a blog.
    #[serde(default)]
    pub is_archive: bool,
}

/// A post type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostType {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
}

/// Lookup table of registered content types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    page_types: HashMap<String, PageType>,
    post_types: HashMap<String, PostType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from lists of types. Later duplicates replace earlier ones.
    pub fn from_types(page_types: Vec<PageType>, post_types: Vec<PostType>) -> Self {
        let mut registry = Self::new();
        for t in page_types {
            registry.register_page_type(t);
        }
        for t in post_types {
            registry.register_post_type(t);
        }
        registry
    }

    pub fn register_page_type(&mut self, page_type: PageType) {
        self.page_types.insert(page_type.id.clone(), page_type);
    }

    pub fn register_post_type(&mut self, post_type: PostType) {
        self.post_types.insert(post_type.id.clone(), post_type);
    }

    pub fn page_type(&self, id: &str) -> Option<&PageType> {
        self.page_types.get(id)
    }

    pub fn post_type(&self, id: &str) -> Option<&PostType> {
        self.post_types.get(id)
    }

    /// Returns `true` if `id` names a registered archive page type.
    pub fn is_archive(&self, id: &str) -> bool {
        self.page_type(id).is_some_and(|t| t.is_archive)
    }

    pub fn page_types(&self) -> impl Iterator<Item = &PageType> {
        self.page_types.values()
    }

    pub fn post_types(&self) -> impl Iterator<Item = &PostType> {
        self.post_types.values()
    }
}
