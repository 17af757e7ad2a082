//! Page entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RedirectType;

/// A routable page of a site.
///
/// `slug` is the full path of the page below the site root without a leading
/// slash (`about/team`) and is unique per site. A page with no parent and
/// `sort_order == 0` is the start page of its site. `published == None` means
/// the page is a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub site_id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
    pub page_type: String,
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
}

impl Page {
    /// Returns `true` if this page is the root page of its site.
    pub fn is_startpage(&self) -> bool {
        self.parent_id.is_none() && self.sort_order == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_startpage() {
        let mut page = Page {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            parent_id: None,
            sort_order: 0,
            page_type: "StandardPage".to_string(),
            title: "Home".to_string(),
            slug: "home".to_string(),
            route: None,
            published: None,
            last_modified: Utc::now(),
            redirect_url: None,
            redirect_type: RedirectType::Permanent,
        };
        assert!(page.is_startpage());

        page.sort_order = 1;
        assert!(!page.is_startpage());

        page.sort_order = 0;
        page.parent_id = Some(Uuid::new_v4());
        assert!(!page.is_startpage());
    }
}
