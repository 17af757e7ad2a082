//! Preview token middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::state::AppState;

/// Attaches the request [`Principal`](crate::pipeline::context::Principal).
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <preview token>
/// ```
///
/// A known preview token grants the page and post preview claims. A missing,
/// malformed or unknown token yields an anonymous principal; the public site
/// never answers `401`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .fallback_service(endpoints)
///     .layer(middleware::from_fn_with_state(state.clone(), layer::rewrite))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let token = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);

    let principal = st.preview.principal_for(token.as_deref());
    if !principal.is_anonymous() {
        tracing::debug!("Preview principal attached");
    }
    parts.extensions.insert(principal);

    next.run(Request::from_parts(parts, body)).await
}
