//! Content entities consumed by the routing core.
//!
//! The router only ever reads these. They are created and edited by the
//! content management side of the system and loaded through the repository
//! traits in [`crate::domain::repositories`].
//!
//! # Entity Types
//!
//! - [`Site`] - A site with its hostname bindings
//! - [`SitemapItem`] - A node in a site's page tree
//! - [`Page`] - A routable page, possibly an archive (blog)
//! - [`Post`] - A routable post belonging to an archive page
//! - [`Alias`] - A literal old-URL to new-URL redirect
//! - [`Taxonomy`] - A category or tag of an archive

pub mod alias;
pub mod page;
pub mod post;
pub mod site;
pub mod sitemap;
pub mod taxonomy;

pub use alias::{Alias, RedirectType};
pub use page::Page;
pub use post::Post;
pub use site::Site;
pub use sitemap::{SitemapItem, build_sitemap};
pub use taxonomy::Taxonomy;

use chrono::{DateTime, Utc};

/// Returns `true` when a publish date is set and has been reached.
///
/// Content with a future publish date is scheduled, which the router treats the
/// same as a draft.
pub fn is_published(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    published.is_some_and(|p| p <= now)
}
