//! Router results.

use uuid::Uuid;

use super::http_cache::HttpCacheInfo;
use crate::domain::entities::RedirectType;
use crate::pipeline::context::Claim;

/// The content a route resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Uuid),
    Post(Uuid),
}

impl RouteTarget {
    pub fn id(self) -> Uuid {
        match self {
            Self::Page(id) | Self::Post(id) => id,
        }
    }

    /// The claim needed to see this content while it is unpublished.
    pub fn preview_claim(self) -> Claim {
        match self {
            Self::Page(_) => Claim::PagePreview,
            Self::Post(_) => Claim::PostPreview,
        }
    }
}

/// A resolved content route. Built fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub target: RouteTarget,
    /// Internal route the request is rewritten to, including unmatched
    /// trailing segments.
    pub route: String,
    /// Query parameters appended to the request's own query string.
    pub query_string: String,
    pub redirect_url: Option<String>,
    pub redirect_type: RedirectType,
    pub is_published: bool,
    pub cache_info: Option<HttpCacheInfo>,
}

/// A matched alias.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasResponse {
    pub redirect_url: String,
    pub redirect_type: RedirectType,
}
