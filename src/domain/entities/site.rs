//! Site entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A site served by the router.
///
/// `hostnames` is a comma separated list of bindings. A binding is either a
/// plain hostname (`example.com`) or a hostname with a path prefix
/// (`example.com/en`) for path based multi-tenancy. Exactly one site is the
/// default and serves requests no binding matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub hostnames: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub last_modified: DateTime<Utc>,
}

impl Site {
    /// Iterates the normalized hostname bindings of the site.
    pub fn bindings(&self) -> impl Iterator<Item = String> + '_ {
        self.hostnames
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|h| h.trim().trim_end_matches('/').to_ascii_lowercase())
            .filter(|h| !h.is_empty())
    }

    /// Returns `true` if the site is bound to `hostname`, compared
    /// case-insensitively. `hostname` may include a path prefix.
    pub fn matches_hostname(&self, hostname: &str) -> bool {
        let wanted = hostname.trim().trim_end_matches('/').to_ascii_lowercase();
        self.bindings().any(|b| b == wanted)
    }
}
