//! Post entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RedirectType;

/// A post belonging to an archive page (a blog).
///
/// `slug` is unique within its blog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub post_type: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub redirect_type: RedirectType,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}
