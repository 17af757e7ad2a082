//! The routing stages and the shared logic applying a resolved route.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use super::context::RequestContext;
use super::{CacheSettings, Flow, Stage};
use crate::domain::entities::RedirectType;
use crate::error::AppError;
use crate::routing::http_cache::{CachePolicy, is_cached};
use crate::routing::{
    AliasRouter, ArchiveRouter, PageRouter, PostRouter, RouteResponse, RouteTarget, RouterEnv,
    StartPageRouter, sitemap,
};

/// Path answered by [`SitemapStage`].
pub const SITEMAP_PATH: &str = "/sitemap.xml";

/// Builds a 301/302 redirect to `location`.
pub fn redirect(location: &str, redirect_type: RedirectType) -> Response {
    let status = match redirect_type {
        RedirectType::Permanent => StatusCode::MOVED_PERMANENTLY,
        RedirectType::Temporary => StatusCode::FOUND,
    };
    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => AppError::internal(
            "Invalid redirect location",
            serde_json::json!({ "location": location }),
        )
        .into_response(),
    }
}

/// Applies a content route to the request.
///
/// 1. Unpublished content without the matching preview claim is treated as
///    no match. Routers already skip such content while matching.
/// 2. Redirect content terminates with 301/302.
/// 3. With HTTP caching enabled, a fresh client copy terminates with 304;
///    otherwise cache headers are queued for the response.
/// 4. The request is rewritten to the content route.
pub(crate) fn apply_route(
    stage: &'static str,
    ctx: &mut RequestContext,
    route: RouteResponse,
    settings: &CacheSettings,
) -> Flow {
    if !route.is_published && !ctx.principal.has_claim(route.target.preview_claim()) {
        debug!(stage, id = %route.target.id(), "Unpublished content without preview claim");
        return Flow::Continue;
    }

    if let Some(location) = route.redirect_url.as_deref() {
        info!(stage, id = %route.target.id(), location, "Redirecting content");
        metrics::counter!("content_router_redirects_total", "stage" => stage).increment(1);
        return Flow::Terminate(redirect(location, route.redirect_type));
    }

    if settings.enabled
        && let Some(info) = route.cache_info.as_ref()
    {
        let expires = match route.target {
            RouteTarget::Page(_) => settings.expires_pages,
            RouteTarget::Post(_) => settings.expires_posts,
        };
        let policy = CachePolicy::for_content(expires, route.is_published);

        if policy != CachePolicy::NoCache && is_cached(&ctx.client_cache, info) {
            debug!(stage, id = %route.target.id(), "Client copy is fresh");
            metrics::counter!("content_router_not_modified_total", "stage" => stage).increment(1);
            let mut response = StatusCode::NOT_MODIFIED.into_response();
            policy.apply(info, response.headers_mut());
            return Flow::Terminate(response);
        }

        policy.apply(info, &mut ctx.response_headers);
    }

    info!(stage, path = %ctx.path, route = %route.route, "Routed request");
    metrics::counter!("content_router_rewrites_total", "stage" => stage).increment(1);
    ctx.rewrite(&route.route, &route.query_string);
    Flow::Continue
}

/// Redirects literal aliases.
pub struct AliasStage {
    env: RouterEnv,
}

impl AliasStage {
    pub fn new(env: RouterEnv) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Stage for AliasStage {
    fn name(&self) -> &'static str {
        "alias"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AppError> {
        let Some(alias) = AliasRouter::invoke(&self.env, &ctx.path, ctx.site.site.id).await? else {
            return Ok(Flow::Continue);
        };

        info!(path = %ctx.path, location = %alias.redirect_url, "Alias redirect");
        metrics::counter!("content_router_redirects_total", "stage" => self.name()).increment(1);
        Ok(Flow::Terminate(redirect(
            &alias.redirect_url,
            alias.redirect_type,
        )))
    }
}

/// Generates a stage wrapping one of the content routers.
macro_rules! content_stage {
    ($(#[$doc:meta])* $stage:ident, $router:ident, $name:literal) => {
        $(#[$doc])*
        pub struct $stage {
            env: RouterEnv,
            settings: CacheSettings,
        }

        impl $stage {
            pub fn new(env: RouterEnv, settings: CacheSettings) -> Self {
                Self { env, settings }
            }
        }

        #[async_trait]
        impl Stage for $stage {
            fn name(&self) -> &'static str {
                $name
            }

            async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AppError> {
                let drafts = ctx.draft_access();
                match $router::invoke(&self.env, &ctx.path, ctx.site.site.id, drafts).await? {
                    Some(route) => Ok(apply_route($name, ctx, route, &self.settings)),
                    None => Ok(Flow::Continue),
                }
            }
        }
    };
}

content_stage!(
    /// Routes pages by longest slug match.
    PageStage,
    PageRouter,
    "page"
);
content_stage!(
    /// Routes posts inside archive pages.
    PostStage,
    PostRouter,
    "post"
);
content_stage!(
    /// Routes archive pages with their filter segments.
    ArchiveStage,
    ArchiveRouter,
    "archive"
);
content_stage!(
    /// Routes the site root to the start page.
    StartPageStage,
    StartPageRouter,
    "startpage"
);

/// Answers `/sitemap.xml` directly.
pub struct SitemapStage {
    env: RouterEnv,
}

impl SitemapStage {
    pub fn new(env: RouterEnv) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Stage for SitemapStage {
    fn name(&self) -> &'static str {
        "sitemap"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AppError> {
        if !ctx.path.eq_ignore_ascii_case(SITEMAP_PATH) {
            return Ok(Flow::Continue);
        }

        let xml = sitemap::render(&self.env, ctx.site.site.id, &ctx.base_url()).await?;
        debug!(site = %ctx.site.site.id, "Rendered sitemap");

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/xml")
            .body(Body::from(xml))
            .map_err(|e| {
                AppError::internal("Sitemap response failed", serde_json::json!({ "reason": e.to_string() }))
            })?;
        Ok(Flow::Terminate(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Site;
    use crate::pipeline::context::{Claim, Principal};
    use crate::routing::http_cache::{ClientCacheInfo, HttpCacheInfo};
    use crate::routing::site_resolver::ResolvedSite;
    use chrono::Utc;
    use uuid::Uuid;

    fn ctx(principal: Principal, client_cache: ClientCacheInfo) -> RequestContext {
        let site = ResolvedSite {
            site: Site {
                id: Uuid::new_v4(),
                title: "Main".to_string(),
                hostnames: None,
                culture: None,
                is_default: true,
                last_modified: Utc::now(),
            },
            prefix: None,
            path: "/about".to_string(),
        };
        RequestContext::new(site, "example.com", "http", None, principal, client_cache)
    }

    fn route(is_published: bool) -> RouteResponse {
        let id = Uuid::new_v4();
        RouteResponse {
            target: RouteTarget::Page(id),
            route: "/page".to_string(),
            query_string: format!("id={}&startpage=false&piranha_handled=true", id),
            redirect_url: None,
            redirect_type: RedirectType::Permanent,
            is_published,
            cache_info: Some(HttpCacheInfo::for_content(id, Utc::now())),
        }
    }

    fn settings() -> CacheSettings {
        CacheSettings {
            enabled: true,
            expires_pages: 10,
            expires_posts: 5,
        }
    }

    #[test]
    fn test_published_route_rewrites_with_cache_headers() {
        let mut ctx = ctx(Principal::anonymous(), ClientCacheInfo::default());

        let flow = apply_route("page", &mut ctx, route(true), &settings());

        assert!(matches!(flow, Flow::Continue));
        assert!(ctx.handled);
        assert_eq!(ctx.rewrite.as_ref().unwrap().path, "/page");
        assert_eq!(
            ctx.response_headers.get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=600"
        );
        assert!(ctx.response_headers.contains_key(header::ETAG));
        assert!(ctx.response_headers.contains_key(header::LAST_MODIFIED));
    }

    #[test]
    fn test_draft_without_claim_is_no_match() {
        let mut ctx = ctx(Principal::anonymous(), ClientCacheInfo::default());

        let flow = apply_route("page", &mut ctx, route(false), &settings());

        assert!(matches!(flow, Flow::Continue));
        assert!(!ctx.handled);
        assert!(ctx.rewrite.is_none());
        assert!(ctx.response_headers.is_empty());
    }

    #[test]
    fn test_draft_with_claim_is_not_cached() {
        let principal = Principal::with_claims([Claim::PagePreview]);
        let mut ctx = ctx(principal, ClientCacheInfo::default());

        apply_route("page", &mut ctx, route(false), &settings());

        assert!(ctx.handled);
        assert_eq!(ctx.response_headers.get(header::CACHE_CONTROL).unwrap(), "no-cache");
        assert!(!ctx.response_headers.contains_key(header::ETAG));
    }

    #[test]
    fn test_post_claim_does_not_unlock_pages() {
        let principal = Principal::with_claims([Claim::PostPreview]);
        let mut ctx = ctx(principal, ClientCacheInfo::default());

        apply_route("page", &mut ctx, route(false), &settings());

        assert!(!ctx.handled);
    }

    #[test]
    fn test_fresh_client_copy_is_not_modified() {
        let route = route(true);
        let client = ClientCacheInfo {
            entity_tag: Some(route.cache_info.as_ref().unwrap().entity_tag.clone()),
            last_modified: None,
        };
        let mut ctx = ctx(Principal::anonymous(), client);

        let Flow::Terminate(response) = apply_route("page", &mut ctx, route, &settings()) else {
            panic!("expected 304");
        };

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().contains_key(header::ETAG));
        assert!(ctx.rewrite.is_none());
    }

    #[test]
    fn test_caching_disabled_skips_headers_and_checks() {
        let route = route(true);
        let client = ClientCacheInfo {
            entity_tag: Some("*".to_string()),
            last_modified: None,
        };
        let mut ctx = ctx(Principal::anonymous(), client);
        let settings = CacheSettings {
            enabled: false,
            ..settings()
        };

        let flow = apply_route("page", &mut ctx, route, &settings);

        assert!(matches!(flow, Flow::Continue));
        assert!(ctx.handled);
        assert!(ctx.response_headers.is_empty());
    }

    #[test]
    fn test_zero_expiry_sends_no_cache() {
        let mut ctx = ctx(Principal::anonymous(), ClientCacheInfo::default());
        let settings = CacheSettings {
            expires_pages: 0,
            ..settings()
        };

        apply_route("page", &mut ctx, route(true), &settings);

        assert_eq!(ctx.response_headers.get(header::CACHE_CONTROL).unwrap(), "no-cache");
    }

    #[test]
    fn test_redirect_content() {
        let mut route = route(true);
        route.redirect_url = Some("/elsewhere".to_string());
        route.redirect_type = RedirectType::Temporary;
        let mut ctx = ctx(Principal::anonymous(), ClientCacheInfo::default());

        let Flow::Terminate(response) = apply_route("page", &mut ctx, route, &settings()) else {
            panic!("expected redirect");
        };

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/elsewhere");
    }

    #[test]
    fn test_redirect_status_codes() {
        assert_eq!(
            redirect("/a", RedirectType::Permanent).status(),
            StatusCode::MOVED_PERMANENTLY
        );
        assert_eq!(redirect("/a", RedirectType::Temporary).status(), StatusCode::FOUND);
    }
}
