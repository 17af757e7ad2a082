//! Hostname and scheme extraction from HTTP requests.

use axum::http::{HeaderMap, Uri, header};

/// Header set by reverse proxies to carry the original scheme.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Extracts the request hostname, lowercased and without port.
///
/// Reads the `Host` header, falling back to the URI authority (HTTP/2 requests
/// carry the host there). Handles:
/// - IPv4 addresses (e.g., `192.168.1.1`)
/// - IPv6 addresses (e.g., `[::1]`)
/// - Hostnames with ports (e.g., `example.com:3000`)
///
/// Returns `None` when neither source yields a usable host.
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))?
        .trim();

    let host = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };

    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// The scheme the client used: `X-Forwarded-Proto`, else the URI scheme,
/// else `http`.
pub fn request_scheme(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .or_else(|| uri.scheme_str().map(str::to_string))
        .unwrap_or_else(|| "http".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    fn path() -> Uri {
        Uri::from_static("/about")
    }

    #[test]
    fn test_host_simple() {
        assert_eq!(
            request_host(&headers("example.com"), &path()).as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn test_host_with_port() {
        assert_eq!(
            request_host(&headers("example.com:3000"), &path()).as_deref(),
            Some("example.com")
        );
        assert_eq!(
            request_host(&headers("192.168.1.1:9000"), &path()).as_deref(),
            Some("192.168.1.1")
        );
    }

    #[test]
    fn test_host_is_lowercased() {
        assert_eq!(
            request_host(&headers("Example.COM"), &path()).as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn test_host_ipv6_with_port() {
        assert_eq!(
            request_host(&headers("[::1]:8080"), &path()).as_deref(),
            Some("[::1]")
        );
    }

    #[test]
    fn test_host_from_uri_authority() {
        let uri = Uri::from_static("https://other.com:8443/about");
        assert_eq!(
            request_host(&HeaderMap::new(), &uri).as_deref(),
            Some("other.com")
        );
    }

    #[test]
    fn test_missing_host() {
        assert!(request_host(&HeaderMap::new(), &path()).is_none());
    }

    #[test]
    fn test_invalid_utf8_host_falls_back() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD]) {
            headers.insert(header::HOST, value);
            assert!(request_host(&headers, &path()).is_none());
        }
    }

    #[test]
    fn test_scheme() {
        let mut forwarded = HeaderMap::new();
        forwarded.insert(FORWARDED_PROTO, HeaderValue::from_static("HTTPS, http"));

        assert_eq!(request_scheme(&forwarded, &path()), "https");
        assert_eq!(request_scheme(&HeaderMap::new(), &path()), "http");
        assert_eq!(
            request_scheme(&HeaderMap::new(), &Uri::from_static("https://a.com/")),
            "https"
        );
    }
}
