//! HTTP cache validation.
//!
//! Provides ETag generation for content, parsing of the client's conditional
//! headers and the decision whether a request can be answered with
//! `304 Not Modified`.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Server-side validators for a piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCacheInfo {
    pub entity_tag: String,
    pub last_modified: DateTime<Utc>,
}

impl HttpCacheInfo {
    /// Builds the validators for content `id` last modified at `last_modified`.
    pub fn for_content(id: Uuid, last_modified: DateTime<Utc>) -> Self {
        Self {
            entity_tag: generate_etag(id, last_modified),
            last_modified,
        }
    }
}

/// Conditional headers sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCacheInfo {
    /// Raw `If-None-Match` value, possibly a comma separated list.
    pub entity_tag: Option<String>,
    /// Parsed `If-Modified-Since`. Unparsable values are dropped.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ClientCacheInfo {
    /// Reads `If-None-Match` and `If-Modified-Since` from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let entity_tag = headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let last_modified = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);

        Self {
            entity_tag,
            last_modified,
        }
    }
}

/// Generates a quoted, deterministic ETag for content `id` at `last_modified`.
///
/// The tag is the hex SHA-256 of the id and the full-precision timestamp, so
/// any change to either yields a new tag.
pub fn generate_etag(id: Uuid, last_modified: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(
        last_modified
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    let digest = hasher.finalize();
    format!("\"{}\"", hex::encode(&digest[..16]))
}

/// Decides whether the client's copy is still fresh.
///
/// A matching entity tag wins regardless of dates. Otherwise the client copy
/// is fresh when its `If-Modified-Since` is at or after the last modification,
/// compared at whole-second precision like the `Last-Modified` header itself.
pub fn is_cached(client: &ClientCacheInfo, server: &HttpCacheInfo) -> bool {
    if client
        .entity_tag
        .as_deref()
        .is_some_and(|tags| etag_matches(tags, &server.entity_tag))
    {
        return true;
    }

    client
        .last_modified
        .is_some_and(|since| since >= server.last_modified.trunc_subsecs(0))
}

/// Checks an `If-None-Match` value against the server tag.
///
/// Supports single tags, comma separated lists, weak tags and `*`.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || candidate.trim_start_matches("W/") == etag
    })
}

/// Parses an HTTP date (IMF-fixdate, RFC 2822 style).
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Formats a timestamp as an IMF-fixdate for `Last-Modified`.
pub fn format_http_date(value: DateTime<Utc>) -> String {
    value.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Cache-Control policy for a routed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with max-age in seconds.
    Public(i64),
    NoCache,
}

impl CachePolicy {
    /// Picks the policy for content: public when an expiry is configured and
    /// the content is published, `no-cache` otherwise.
    pub fn for_content(expires_minutes: i64, is_published: bool) -> Self {
        if expires_minutes > 0 && is_published {
            Self::Public(expires_minutes * 60)
        } else {
            Self::NoCache
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }

    /// Writes `Cache-Control`, and for public content `ETag` and
    /// `Last-Modified`, into `headers`.
    pub fn apply(self, info: &HttpCacheInfo, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(&self.to_header_value()) {
            headers.insert(header::CACHE_CONTROL, value);
        }

        if let Self::Public(_) = self {
            if let Ok(value) = HeaderValue::from_str(&info.entity_tag) {
                headers.insert(header::ETAG, value);
            }
            if let Ok(value) = HeaderValue::from_str(&format_http_date(info.last_modified)) {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }
    }
}
