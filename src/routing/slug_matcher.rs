//! Longest-prefix slug matching.

use std::future::Future;

use crate::error::AppError;

/// A slug lookup hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SlugMatch<T> {
    pub item: T,
    /// Index one past the last segment that belongs to the slug.
    pub consumed: usize,
}

/// Finds the longest slug made of `segments[offset..n]` for which `lookup`
/// returns an item, trying `n` from `segments.len()` down to `offset + 1`.
///
/// The first (longest) hit wins. Segments after the match are left to the
/// caller as a sub-route, so `/blog/my-post/action` with a post `my-post`
/// matches two segments and keeps `action`.
///
/// # Errors
///
/// Propagates lookup errors. A failed lookup is never treated as a miss.
pub async fn match_slug<T, F, Fut>(
    segments: &[String],
    offset: usize,
    lookup: F,
) -> Result<Option<SlugMatch<T>>, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<T>, AppError>>,
{
    match_slug_until(segments, offset, segments.len(), lookup).await
}

/// Like [`match_slug`], but never lets the slug extend past `end`.
///
/// # Errors
///
/// Propagates lookup errors.
pub async fn match_slug_until<T, F, Fut>(
    segments: &[String],
    offset: usize,
    end: usize,
    mut lookup: F,
) -> Result<Option<SlugMatch<T>>, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<T>, AppError>>,
{
    let end = end.min(segments.len());

    for n in (offset + 1..=end).rev() {
        let slug = segments[offset..n].join("/");
        if let Some(item) = lookup(slug).await? {
            return Ok(Some(SlugMatch { item, consumed: n }));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::split_segments;
    use serde_json::json;
    use std::sync::Mutex;

    fn known(slugs: &'static [&'static str]) -> impl FnMut(String) -> std::future::Ready<Result<Option<String>, AppError>> {
        move |slug| {
            let hit = slugs.contains(&slug.as_str()).then_some(slug);
            std::future::ready(Ok(hit))
        }
    }

    #[tokio::test]
    async fn test_longest_match_wins() {
        let segments = split_segments("/about/team/lead");
        let result = match_slug(&segments, 0, known(&["about", "about/team"]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.item, "about/team");
        assert_eq!(result.consumed, 2);
    }

    #[tokio::test]
    async fn test_offset_scopes_the_slug() {
        let segments = split_segments("/blog/my-post/action");
        let result = match_slug(&segments, 1, known(&["my-post", "blog"]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.item, "my-post");
        assert_eq!(result.consumed, 2);
        assert_eq!(&segments[result.consumed..], ["action".to_string()]);
    }

    #[tokio::test]
    async fn test_tries_longest_first() {
        let tried = Mutex::new(Vec::new());
        let segments = split_segments("/a/b/c");

        let result = match_slug(&segments, 0, |slug| {
            tried.lock().unwrap().push(slug);
            std::future::ready(Ok::<Option<String>, AppError>(None))
        })
        .await
        .unwrap();

        assert!(result.is_none());
        assert_eq!(*tried.lock().unwrap(), vec!["a/b/c", "a/b", "a"]);
    }

    #[tokio::test]
    async fn test_until_limits_length() {
        let segments = split_segments("/blog/post");
        let result = match_slug_until(&segments, 0, 1, known(&["blog/post", "blog"]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.item, "blog");
        assert_eq!(result.consumed, 1);
    }

    #[tokio::test]
    async fn test_no_segments_no_match() {
        let result = match_slug(&[], 0, known(&[""])).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_lookup_error_propagates() {
        let segments = split_segments("/x");
        let result = match_slug(&segments, 0, |_| {
            std::future::ready(Err::<Option<String>, _>(AppError::internal(
                "Database error",
                json!({}),
            )))
        })
        .await;

        assert!(result.is_err());
    }
}
