//! URL-to-content routing core.
//!
//! Given a site and a request path, the routers in this module decide which
//! content the path addresses and which internal route should serve it. They
//! only read content through [`ContentApi`] and never touch the HTTP request;
//! applying their results is the job of [`crate::pipeline`].
//!
//! # Modules
//!
//! - [`site_resolver`] - hostname (+ optional path prefix) to site
//! - [`slug_matcher`] - longest-prefix slug matching over path segments
//! - [`alias_router`] - literal redirects
//! - [`page_router`], [`post_router`], [`archive_router`], [`startpage_router`] - content routes
//! - [`http_cache`] - ETag generation and conditional request evaluation
//! - [`sitemap`] - `sitemap.xml` rendering

pub mod alias_router;
pub mod archive_router;
pub mod http_cache;
pub mod page_router;
pub mod post_router;
pub mod response;
pub mod site_resolver;
pub mod sitemap;
pub mod slug_matcher;
pub mod startpage_router;

pub use alias_router::AliasRouter;
pub use archive_router::ArchiveRouter;
pub use page_router::PageRouter;
pub use post_router::PostRouter;
pub use response::{AliasResponse, RouteResponse, RouteTarget};
pub use startpage_router::StartPageRouter;

use chrono::Utc;
use std::sync::Arc;

use crate::application::services::ContentApi;
use crate::domain::content_types::TypeRegistry;
use crate::domain::entities::{Page, Post, is_published};

/// Query key marking a request as already routed in this pass.
pub const HANDLED_KEY: &str = "piranha_handled";

/// Default route for pages whose type declares none.
pub const DEFAULT_PAGE_ROUTE: &str = "/page";
/// Default route for posts whose type declares none.
pub const DEFAULT_POST_ROUTE: &str = "/post";
/// Default route for archive pages whose type declares none.
pub const DEFAULT_ARCHIVE_ROUTE: &str = "/archive";

/// What every router reads from: the content API and the type registry.
#[derive(Clone)]
pub struct RouterEnv {
    pub api: Arc<ContentApi>,
    pub types: Arc<TypeRegistry>,
}

impl RouterEnv {
    pub fn new(api: Arc<ContentApi>, types: Arc<TypeRegistry>) -> Self {
        Self { api, types }
    }
}

/// Unpublished content a request may see.
///
/// Routers apply this while matching, so hidden content counts as a miss and a
/// shorter published slug can still match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftAccess {
    pub pages: bool,
    pub posts: bool,
}

impl DraftAccess {
    pub const NONE: Self = Self {
        pages: false,
        posts: false,
    };
    pub const ALL: Self = Self {
        pages: true,
        posts: true,
    };

    pub fn visible_page(self, page: Option<Page>) -> Option<Page> {
        page.filter(|p| self.pages || is_published(p.published, Utc::now()))
    }

    pub fn visible_post(self, post: Option<Post>) -> Option<Post> {
        post.filter(|p| self.posts || is_published(p.published, Utc::now()))
    }
}

/// Splits a request path into its non-empty segments.
pub fn split_segments(url: &str) -> Vec<String> {
    url.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Appends unmatched trailing segments to a route.
pub fn append_segments(route: &str, rest: &[String]) -> String {
    if rest.is_empty() {
        route.to_string()
    } else {
        format!("{}/{}", route.trim_end_matches('/'), rest.join("/"))
    }
}
