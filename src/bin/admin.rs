//! Operator CLI for content-router.
//!
//! Runs the routing pipeline offline against a content file, renders sitemaps
//! and produces preview token hashes and ETags without a running server.
//!
//! # Usage
//!
//! ```bash
//! # Show where a public URL routes to
//! cargo run --bin admin -- resolve --host example.com /blog/my-post
//!
//! # Same, as a preview token holder would see it
//! cargo run --bin admin -- resolve --host example.com --preview /drafts/upcoming
//!
//! # Print the sitemap of a site
//! cargo run --bin admin -- sitemap --host example.com
//!
//! # Hash a preview token for PREVIEW_TOKEN_HASHES
//! cargo run --bin admin -- token hash "my-preview-token"
//!
//! # Compute the ETag of a content revision
//! cargo run --bin admin -- etag 7d1a... 2024-03-01T12:30:15Z
//! ```
//!
//! # Environment Variables
//!
//! - `CONTENT_FILE`: content file for `resolve` and `sitemap` (or `--file`)
//! - `PREVIEW_SIGNING_SECRET`: HMAC key for `token hash` (or `--secret`)

use content_router::application::services::{ContentApi, PreviewService};
use content_router::infrastructure::cache::NullCache;
use content_router::infrastructure::memory::MemoryContentStore;
use content_router::pipeline::context::{Claim, Principal, RequestContext};
use content_router::pipeline::{CacheSettings, Flow, Pipeline};
use content_router::routing::RouterEnv;
use content_router::routing::http_cache::{ClientCacheInfo, generate_etag};
use content_router::routing::site_resolver::{ResolvedSite, resolve_site};
use content_router::routing::sitemap;

use anyhow::{Context, Result};
use axum::http::header;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for content-router operators.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show how a URL is routed
    Resolve {
        /// Request hostname
        #[arg(long)]
        host: String,

        /// Content file (defaults to CONTENT_FILE)
        #[arg(short, long, env = "CONTENT_FILE")]
        file: String,

        /// Resolve with page and post preview claims
        #[arg(long)]
        preview: bool,

        /// Request path, e.g. /blog/my-post
        path: String,
    },

    /// Print the sitemap.xml of a site
    Sitemap {
        #[arg(long)]
        host: String,

        #[arg(short, long, env = "CONTENT_FILE")]
        file: String,

        /// Scheme used in <loc> entries
        #[arg(long, default_value = "https")]
        scheme: String,
    },

    /// Preview token utilities
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Print the ETag of a content revision
    Etag {
        /// Content id
        id: Uuid,

        /// Last modification time, RFC 3339
        last_modified: DateTime<Utc>,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Hash a raw preview token
    Hash {
        token: String,

        #[arg(long, env = "PREVIEW_SIGNING_SECRET")]
        secret: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            host,
            file,
            preview,
            path,
        } => resolve(&file, &host, &path, preview).await?,
        Commands::Sitemap { host, file, scheme } => print_sitemap(&file, &host, &scheme).await?,
        Commands::Token {
            action: TokenAction::Hash { token, secret },
        } => hash_token(&token, &secret)?,
        Commands::Etag { id, last_modified } => {
            println!("{}", generate_etag(id, last_modified));
        }
    }

    Ok(())
}

/// Loads a content file into a router environment.
async fn load_env(file: &str) -> Result<RouterEnv> {
    let store = MemoryContentStore::load(file).await?;
    let types = store.seed().type_registry();
    let api = ContentApi::from_store(Arc::new(store), Arc::new(NullCache::new()));
    Ok(RouterEnv::new(Arc::new(api), Arc::new(types)))
}

async fn resolve_or_fail(env: &RouterEnv, host: &str, path: &str) -> Result<ResolvedSite> {
    resolve_site(&env.api, &host.to_ascii_lowercase(), path)
        .await
        .context("Site lookup failed")?
        .context("No site matches and no default site is configured")
}

async fn resolve(file: &str, host: &str, path: &str, preview: bool) -> Result<()> {
    let env = load_env(file).await?;
    let site = resolve_or_fail(&env, host, path).await?;

    println!("{}", "🧭 Routing".bright_blue().bold());
    println!();
    println!("  Site:  {} ({})", site.site.title.cyan(), site.site.id);
    if let Some(prefix) = &site.prefix {
        println!("  Prefix: /{}", prefix.cyan());
    }
    println!("  Path:  {}", site.path);

    let principal = if preview {
        Principal::with_claims([Claim::PagePreview, Claim::PostPreview])
    } else {
        Principal::anonymous()
    };
    let settings = CacheSettings {
        enabled: false,
        ..Default::default()
    };
    let pipeline = Pipeline::new(env, settings);
    let mut ctx = RequestContext::new(
        site,
        host,
        "https",
        None,
        principal,
        ClientCacheInfo::default(),
    );

    let flow = pipeline
        .run(&mut ctx)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    println!();

    match flow {
        Flow::Terminate(response) => {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            println!(
                "  {} {} -> {}",
                "Responds".green().bold(),
                response.status(),
                location.bright_yellow()
            );
        }
        Flow::Continue => match ctx.rewrite {
            Some(rewrite) => println!(
                "  {} {}",
                "Rewrites to".green().bold(),
                rewrite.path_and_query().bright_yellow()
            ),
            None => println!("  {}", "No match, passed through".yellow()),
        },
    }
    println!();

    Ok(())
}

async fn print_sitemap(file: &str, host: &str, scheme: &str) -> Result<()> {
    let env = load_env(file).await?;
    let site = resolve_or_fail(&env, host, "/").await?;

    let base_url = format!("{}://{}", scheme, host);
    let xml = sitemap::render(&env, site.site.id, &base_url)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("{}", xml);

    Ok(())
}

fn hash_token(token: &str, secret: &str) -> Result<()> {
    if secret.is_empty() {
        anyhow::bail!("PREVIEW_SIGNING_SECRET must not be empty");
    }

    let hash = PreviewService::hash_token(secret, token);

    println!("{}", "🔑 Preview token hash".bright_blue().bold());
    println!();
    println!("  {}", hash.bright_yellow().bold());
    println!();
    println!("{}", "Add it to PREVIEW_TOKEN_HASHES (comma separated).".bright_white());

    Ok(())
}
