//! Category and tag entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category or a tag of an archive page.
///
/// Slugs are unique per archive and per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub title: String,
    pub slug: String,
}
