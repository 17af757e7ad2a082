//! Hostname to site resolution.

use tracing::debug;

use crate::application::services::ContentApi;
use crate::domain::entities::Site;
use crate::error::AppError;

/// A site resolved for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSite {
    pub site: Site,
    /// First path segment consumed by a `host/prefix` binding.
    pub prefix: Option<String>,
    /// The request path relative to the site root.
    pub path: String,
}

impl ResolvedSite {
    /// Number of path segments the binding consumed.
    pub fn consumed(&self) -> usize {
        usize::from(self.prefix.is_some())
    }
}

/// Resolves the site serving `hostname` and `path`.
///
/// 1. `"{hostname}/{first segment}"` as a compound binding; on a hit the
///    segment is removed from the path.
/// 2. `hostname` alone.
/// 3. The default site.
///
/// Returns `Ok(None)` only when no default site is configured; callers pass the
/// request through untouched in that case.
///
/// # Errors
///
/// Propagates content API errors.
pub async fn resolve_site(
    api: &ContentApi,
    hostname: &str,
    path: &str,
) -> Result<Option<ResolvedSite>, AppError> {
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (trimmed, ""),
    };

    if !first.is_empty()
        && let Some(site) = api
            .site_by_hostname(&format!("{}/{}", hostname, first))
            .await?
    {
        debug!(site = %site.id, prefix = first, "Resolved site by host prefix");
        return Ok(Some(ResolvedSite {
            site,
            prefix: Some(first.to_string()),
            path: format!("/{}", rest),
        }));
    }

    let site = match api.site_by_hostname(hostname).await? {
        Some(site) => Some(site),
        None => api.default_site().await?,
    };

    Ok(site.map(|site| ResolvedSite {
        site,
        prefix: None,
        path: path.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::NullCache;
    use crate::infrastructure::memory::{ContentSeed, MemoryContentStore};
    use chrono::Utc;
    use std::sync::Arc;
    use uuid::Uuid;

    fn site(title: &str, hostnames: Option<&str>, is_default: bool) -> Site {
        Site {
            id: Uuid::new_v4(),
            title: title.to_string(),
            hostnames: hostnames.map(str::to_string),
            culture: None,
            is_default,
            last_modified: Utc::now(),
        }
    }

    fn api(sites: Vec<Site>) -> ContentApi {
        let store = MemoryContentStore::new(ContentSeed {
            sites,
            ..Default::default()
        });
        ContentApi::from_store(Arc::new(store), Arc::new(NullCache::new()))
    }

    #[tokio::test]
    async fn test_prefix_binding_consumes_segment() {
        let api = api(vec![
            site("Main", Some("example.com"), true),
            site("English", Some("example.com/en"), false),
        ]);

        let resolved = resolve_site(&api, "example.com", "/en/about/team")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.site.title, "English");
        assert_eq!(resolved.prefix.as_deref(), Some("en"));
        assert_eq!(resolved.path, "/about/team");
        assert_eq!(resolved.consumed(), 1);
    }

    #[tokio::test]
    async fn test_prefix_binding_root() {
        let api = api(vec![site("English", Some("example.com/en"), true)]);

        let resolved = resolve_site(&api, "example.com", "/en")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.path, "/");
    }

    #[tokio::test]
    async fn test_plain_hostname() {
        let api = api(vec![
            site("Main", Some("example.com"), true),
            site("Other", Some("other.com"), false),
        ]);

        let resolved = resolve_site(&api, "other.com", "/about")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.site.title, "Other");
        assert!(resolved.prefix.is_none());
        assert_eq!(resolved.path, "/about");
    }

    #[tokio::test]
    async fn test_falls_back_to_default() {
        let api = api(vec![
            site("Main", Some("example.com"), true),
            site("Other", Some("other.com"), false),
        ]);

        let resolved = resolve_site(&api, "unknown.org", "/")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.site.title, "Main");
    }

    #[tokio::test]
    async fn test_no_default_site() {
        let api = api(vec![site("Other", Some("other.com"), false)]);

        let resolved = resolve_site(&api, "unknown.org", "/about").await.unwrap();

        assert!(resolved.is_none());
    }
}
