//! Alias entity and redirect type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of HTTP redirect issued for an alias or a redirecting page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectType {
    #[default]
    Permanent,
    Temporary,
}

impl RedirectType {
    /// HTTP status code for this redirect: 301 or 302.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Permanent => 301,
            Self::Temporary => 302,
        }
    }

    /// Parses the stored representation, defaulting to permanent.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("temporary") {
            Self::Temporary
        } else {
            Self::Permanent
        }
    }
}

/// A literal redirect from an old URL to a new one, scoped to a site.
///
/// `alias_url` is unique within a site and always starts with `/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub id: Uuid,
    pub site_id: Uuid,
    pub alias_url: String,
    pub redirect_url: String,
    #[serde(default)]
    pub redirect_type: RedirectType,
}
