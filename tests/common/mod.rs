#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

use content_router::application::services::{ContentApi, PreviewService};
use content_router::domain::content_types::{PageType, PostType};
use content_router::domain::entities::{Alias, Page, Post, RedirectType, Site, Taxonomy};
use content_router::infrastructure::cache::NullCache;
use content_router::infrastructure::memory::{ContentSeed, MemoryContentStore};
use content_router::pipeline::CacheSettings;
use content_router::routes::app_router;
use content_router::state::AppState;

pub const PREVIEW_SECRET: &str = "test-signing-secret";
pub const PREVIEW_TOKEN: &str = "preview-token";

pub const MAIN_SITE: Uuid = Uuid::from_u128(0x100);
pub const OTHER_SITE: Uuid = Uuid::from_u128(0x200);
pub const EN_SITE: Uuid = Uuid::from_u128(0x300);

pub const HOME: Uuid = Uuid::from_u128(0x101);
pub const ABOUT: Uuid = Uuid::from_u128(0x102);
pub const TEAM: Uuid = Uuid::from_u128(0x103);
pub const BLOG: Uuid = Uuid::from_u128(0x104);
pub const OLD_URL_PAGE: Uuid = Uuid::from_u128(0x105);
pub const DRAFT_PAGE: Uuid = Uuid::from_u128(0x106);
pub const MOVED_PAGE: Uuid = Uuid::from_u128(0x107);
pub const HEALTHY_EATING: Uuid = Uuid::from_u128(0x108);
pub const CAREERS_DRAFT: Uuid = Uuid::from_u128(0x109);

pub const OTHER_NEWS: Uuid = Uuid::from_u128(0x201);
pub const OTHER_ABOUT: Uuid = Uuid::from_u128(0x202);

pub const EN_HOME: Uuid = Uuid::from_u128(0x301);
pub const EN_ABOUT: Uuid = Uuid::from_u128(0x302);

pub const MY_POST: Uuid = Uuid::from_u128(0x401);
pub const DRAFT_POST: Uuid = Uuid::from_u128(0x402);
pub const OLDER_POST: Uuid = Uuid::from_u128(0x403);

pub const DEFAULT_CATEGORY: Uuid = Uuid::from_u128(0x501);
pub const RUST_TAG: Uuid = Uuid::from_u128(0x502);

/// Last modification of every fixture item.
pub fn last_modified() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn published() -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
}

fn site(id: Uuid, title: &str, hostnames: &str, culture: &str, is_default: bool) -> Site {
    Site {
        id,
        title: title.to_string(),
        hostnames: Some(hostnames.to_string()),
        culture: Some(culture.to_string()),
        is_default,
        last_modified: last_modified(),
    }
}

fn page(id: Uuid, site_id: Uuid, slug: &str, page_type: &str, sort_order: i32) -> Page {
    Page {
        id,
        site_id,
        parent_id: None,
        sort_order,
        page_type: page_type.to_string(),
        title: slug.to_string(),
        slug: slug.to_string(),
        route: None,
        published: published(),
        last_modified: last_modified(),
        redirect_url: None,
        redirect_type: RedirectType::Permanent,
    }
}

fn post(id: Uuid, slug: &str, published: Option<DateTime<Utc>>) -> Post {
    Post {
        id,
        blog_id: BLOG,
        post_type: "StandardPost".to_string(),
        title: slug.to_string(),
        slug: slug.to_string(),
        route: None,
        published,
        last_modified: last_modified(),
        redirect_url: None,
        redirect_type: RedirectType::Permanent,
        category_id: Some(DEFAULT_CATEGORY),
        tag_ids: vec![RUST_TAG],
    }
}

/// Three sites:
///
/// - `example.com` (default, `en-US`): start page, `/about`, `/about/team`,
///   the `/blog` archive, an `/old-url` page shadowed by an alias, drafts at
///   `/drafts/upcoming` and `/about/careers`, and a redirect page
/// - `other.com`: an archive start page and its own `/about`
/// - `example.com/en` (`en-GB`): start page and `/about`
pub fn seed() -> ContentSeed {
    let mut team = page(TEAM, MAIN_SITE, "about/team", "StandardPage", 0);
    team.parent_id = Some(ABOUT);

    let mut draft = page(DRAFT_PAGE, MAIN_SITE, "drafts/upcoming", "StandardPage", 5);
    draft.published = None;

    let mut careers = page(CAREERS_DRAFT, MAIN_SITE, "about/careers", "StandardPage", 1);
    careers.parent_id = Some(ABOUT);
    careers.published = None;

    let mut moved = page(MOVED_PAGE, MAIN_SITE, "moved", "StandardPage", 6);
    moved.redirect_url = Some("https://elsewhere.test/".to_string());
    moved.redirect_type = RedirectType::Temporary;

    let mut older = post(
        OLDER_POST,
        "older-post",
        Some(Utc.with_ymd_and_hms(2017, 5, 1, 0, 0, 0).unwrap()),
    );
    older.category_id = None;
    older.tag_ids = vec![];

    ContentSeed {
        page_types: vec![
            PageType {
                id: "StandardPage".to_string(),
                title: Some("Standard page".to_string()),
                route: None,
                is_archive: false,
            },
            PageType {
                id: "BlogArchive".to_string(),
                title: Some("Blog".to_string()),
                route: None,
                is_archive: true,
            },
        ],
        post_types: vec![PostType {
            id: "StandardPost".to_string(),
            title: Some("Standard post".to_string()),
            route: None,
        }],
        sites: vec![
            site(MAIN_SITE, "Main", "example.com, www.example.com", "en-US", true),
            site(OTHER_SITE, "Other", "other.com", "sv-SE", false),
            site(EN_SITE, "English", "example.com/en", "en-GB", false),
        ],
        pages: vec![
            page(HOME, MAIN_SITE, "home", "StandardPage", 0),
            page(ABOUT, MAIN_SITE, "about", "StandardPage", 1),
            team,
            careers,
            page(BLOG, MAIN_SITE, "blog", "BlogArchive", 2),
            page(OLD_URL_PAGE, MAIN_SITE, "old-url", "StandardPage", 3),
            draft,
            moved,
            page(HEALTHY_EATING, MAIN_SITE, "healthy-eating", "StandardPage", 7),
            page(OTHER_NEWS, OTHER_SITE, "news", "BlogArchive", 0),
            page(OTHER_ABOUT, OTHER_SITE, "about", "StandardPage", 1),
            page(EN_HOME, EN_SITE, "home", "StandardPage", 0),
            page(EN_ABOUT, EN_SITE, "about", "StandardPage", 1),
        ],
        posts: vec![
            post(
                MY_POST,
                "my-post",
                Some(Utc.with_ymd_and_hms(2018, 2, 10, 9, 0, 0).unwrap()),
            ),
            post(DRAFT_POST, "draft-post", None),
            older,
        ],
        categories: vec![Taxonomy {
            id: DEFAULT_CATEGORY,
            blog_id: BLOG,
            title: "Default category".to_string(),
            slug: "default-category".to_string(),
        }],
        tags: vec![Taxonomy {
            id: RUST_TAG,
            blog_id: BLOG,
            title: "Rust".to_string(),
            slug: "rust".to_string(),
        }],
        aliases: vec![
            Alias {
                id: Uuid::from_u128(0x601),
                site_id: MAIN_SITE,
                alias_url: "/old-url".to_string(),
                redirect_url: "/about".to_string(),
                redirect_type: RedirectType::Permanent,
            },
            Alias {
                id: Uuid::from_u128(0x602),
                site_id: MAIN_SITE,
                alias_url: "/promo".to_string(),
                redirect_url: "/blog".to_string(),
                redirect_type: RedirectType::Temporary,
            },
        ],
    }
}

pub fn caching() -> CacheSettings {
    CacheSettings {
        enabled: true,
        expires_pages: 30,
        expires_posts: 10,
    }
}

pub fn create_test_state(settings: CacheSettings) -> AppState {
    let seed = seed();
    let types = seed.type_registry();
    let content = ContentApi::from_store(
        Arc::new(MemoryContentStore::new(seed)),
        Arc::new(NullCache::new()),
    );
    let preview = PreviewService::new(
        PREVIEW_SECRET.to_string(),
        vec![PreviewService::hash_token(PREVIEW_SECRET, PREVIEW_TOKEN)],
    );

    AppState::new(content, types, settings, preview)
}

pub fn create_test_server(settings: CacheSettings) -> TestServer {
    TestServer::new(app_router(create_test_state(settings))).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {}", PREVIEW_TOKEN)
}
