//! Per-request routing state.

use axum::http::HeaderMap;
use std::collections::HashSet;
use url::form_urlencoded;

use crate::domain::entities::Site;
use crate::routing::{DraftAccess, HANDLED_KEY};
use crate::routing::http_cache::ClientCacheInfo;
use crate::routing::site_resolver::ResolvedSite;

/// Permissions carried by the request principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Claim {
    /// May see unpublished pages, archives and start pages.
    PagePreview,
    /// May see unpublished posts.
    PostPreview,
}

/// The caller of a request. Anonymous unless a preview token was presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    claims: HashSet<Claim>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_claims(claims: impl IntoIterator<Item = Claim>) -> Self {
        Self {
            claims: claims.into_iter().collect(),
        }
    }

    pub fn has_claim(&self, claim: Claim) -> bool {
        self.claims.contains(&claim)
    }

    pub fn is_anonymous(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Request extension holding the site a request was resolved to.
///
/// Inserted by the routing middleware before the request reaches the
/// endpoint handlers.
#[derive(Debug, Clone)]
pub struct CurrentSite {
    pub site: Site,
    pub prefix: Option<String>,
}

impl CurrentSite {
    pub fn culture(&self) -> Option<&str> {
        self.site.culture.as_deref()
    }
}

/// A pending rewrite of the request URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub path: String,
    pub query: String,
}

impl Rewrite {
    /// The rewritten path and query, ready to parse as a URI.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Everything the pipeline stages read and write for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub site: ResolvedSite,
    /// Request hostname without port.
    pub host: String,
    /// `http` or `https`, used when rendering absolute URLs.
    pub scheme: String,
    /// Path relative to the site root.
    pub path: String,
    /// Original query string, without the leading `?`.
    pub query: Option<String>,
    pub principal: Principal,
    pub client_cache: ClientCacheInfo,
    /// Guard flag set once a stage rewrites the request.
    pub handled: bool,
    pub rewrite: Option<Rewrite>,
    /// Headers added to the downstream response.
    pub response_headers: HeaderMap,
}

impl RequestContext {
    pub fn new(
        site: ResolvedSite,
        host: impl Into<String>,
        scheme: impl Into<String>,
        query: Option<String>,
        principal: Principal,
        client_cache: ClientCacheInfo,
    ) -> Self {
        let path = site.path.clone();
        Self {
            site,
            host: host.into(),
            scheme: scheme.into(),
            path,
            query,
            principal,
            client_cache,
            handled: false,
            rewrite: None,
            response_headers: HeaderMap::new(),
        }
    }

    /// Unpublished content the principal may be routed to.
    pub fn draft_access(&self) -> DraftAccess {
        DraftAccess {
            pages: self.principal.has_claim(Claim::PagePreview),
            posts: self.principal.has_claim(Claim::PostPreview),
        }
    }

    /// `true` when a stage already routed this request or the incoming query
    /// carries the handled marker.
    pub fn is_handled(&self) -> bool {
        self.handled
            || self.query.as_deref().is_some_and(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .any(|(key, value)| key == HANDLED_KEY && value == "true")
            })
    }

    /// Records a rewrite to `route` with `route_query` appended to the
    /// original query string, and marks the request handled.
    ///
    /// Original pairs whose key the router sets are dropped so every key
    /// appears once.
    pub fn rewrite(&mut self, route: &str, route_query: &str) {
        let route_keys: HashSet<String> = form_urlencoded::parse(route_query.as_bytes())
            .map(|(key, _)| key.into_owned())
            .collect();

        let original: Vec<&str> = self
            .query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| {
                form_urlencoded::parse(pair.as_bytes())
                    .next()
                    .is_none_or(|(key, _)| !route_keys.contains(key.as_ref()))
            })
            .collect();

        let query = match (original.is_empty(), route_query.is_empty()) {
            (true, _) => route_query.to_string(),
            (false, true) => original.join("&"),
            (false, false) => format!("{}&{}", original.join("&"), route_query),
        };

        self.rewrite = Some(Rewrite {
            path: route.to_string(),
            query,
        });
        self.handled = true;
    }

    /// Absolute URL of the site root, including a prefix binding.
    pub fn base_url(&self) -> String {
        match &self.site.prefix {
            Some(prefix) => format!("{}://{}/{}", self.scheme, self.host, prefix),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }
}
