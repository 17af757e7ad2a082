//! Loads the content type registry from PostgreSQL.

use sqlx::PgPool;

use crate::domain::content_types::{PageType, PostType, TypeRegistry};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct PageTypeRow {
    id: String,
    title: Option<String>,
    route: Option<String>,
    is_archive: bool,
}

#[derive(sqlx::FromRow)]
struct PostTypeRow {
    id: String,
    title: Option<String>,
    route: Option<String>,
}

/// Reads every registered page and post type.
///
/// Types change only with deployments, so the registry is loaded once at
/// startup and never refreshed.
///
/// # Errors
///
/// Returns [`AppError::Internal`] on database errors.
pub async fn load_type_registry(pool: &PgPool) -> Result<TypeRegistry, AppError> {
    let page_types = sqlx::query_as::<_, PageTypeRow>(
        "SELECT id, title, route, is_archive FROM page_types ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|r| PageType {
        id: r.id,
        title: r.title,
        route: r.route,
        is_archive: r.is_archive,
    })
    .collect();

    let post_types = sqlx::query_as::<_, PostTypeRow>(
        "SELECT id, title, route FROM post_types ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|r| PostType {
        id: r.id,
        title: r.title,
        route: r.route,
    })
    .collect();

    Ok(TypeRegistry::from_types(page_types, post_types))
}
