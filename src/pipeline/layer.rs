//! Axum middleware running the routing pipeline.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Uri, header},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tracing::{debug, warn};

use super::context::{CurrentSite, Principal, RequestContext};
use super::{Flow, is_passthrough};
use crate::error::AppError;
use crate::routing::http_cache::ClientCacheInfo;
use crate::routing::site_resolver::resolve_site;
use crate::state::AppState;
use crate::utils::host::{request_host, request_scheme};

/// Resolves the site, runs the pipeline and rewrites the request URI.
///
/// Must be applied outside endpoint routing (`Router::layer` on a router
/// whose endpoints are reached through `fallback_service`), otherwise the
/// rewrite happens after the route was chosen.
///
/// Requests are passed through untouched when:
/// - the path is under one of the passthrough prefixes
/// - the request has no host
/// - no site matches and no default site exists
///
/// # Errors
///
/// - `400 Bad Request` when the rewritten URI is malformed
/// - `500 Internal Server Error` when the content store fails
pub async fn rewrite(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();
    if is_passthrough(&path) {
        return Ok(next.run(req).await);
    }

    let Some(host) = request_host(req.headers(), req.uri()) else {
        debug!(%path, "Request without host, passing through");
        return Ok(next.run(req).await);
    };

    let Some(site) = resolve_site(&st.content, &host, &path).await? else {
        warn!(%host, "No site matches and no default site is configured");
        return Ok(next.run(req).await);
    };

    let principal = req
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_default();

    let mut ctx = RequestContext::new(
        site,
        host,
        request_scheme(req.headers(), req.uri()),
        req.uri().query().map(str::to_string),
        principal,
        ClientCacheInfo::from_headers(req.headers()),
    );

    let current = CurrentSite {
        site: ctx.site.site.clone(),
        prefix: ctx.site.prefix.clone(),
    };

    if let Flow::Terminate(response) = st.pipeline.run(&mut ctx).await? {
        return Ok(response);
    }

    if let Some(rewrite) = ctx.rewrite.as_ref() {
        let target = rewrite.path_and_query();
        let uri: Uri = target.parse().map_err(|_| {
            AppError::bad_request("Malformed request path", json!({ "path": path }))
        })?;
        debug!(from = %path, to = %target, "Rewriting request");
        *req.uri_mut() = uri;
    }

    let culture = current.culture().map(str::to_string);
    req.extensions_mut().insert(current);

    let mut response = next.run(req).await;

    if response.status().is_success() {
        response.headers_mut().extend(ctx.response_headers);
    }
    if let Some(culture) = culture
        && !response.headers().contains_key(header::CONTENT_LANGUAGE)
        && let Ok(value) = HeaderValue::from_str(&culture)
    {
        response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }

    Ok(response)
}
