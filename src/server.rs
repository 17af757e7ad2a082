//! HTTP server initialization and runtime setup.
//!
//! Handles the content store, cache setup and the Axum server lifecycle.

use crate::application::services::{ContentApi, PreviewService};
use crate::config::{Config, ContentSource};
use crate::domain::content_types::TypeRegistry;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::memory::MemoryContentStore;
use crate::infrastructure::persistence::{
    PgAliasRepository, PgPageRepository, PgPostRepository, PgSiteRepository, load_type_registry,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;

/// Connects the object cache, falling back to [`NullCache`] when Redis is
/// not configured or unreachable.
pub async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    }
}

/// Opens the configured content source.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// content file cannot be read.
pub async fn open_content(
    config: &Config,
    cache: Arc<dyn CacheService>,
) -> Result<(ContentApi, TypeRegistry)> {
    match &config.content_source {
        ContentSource::Database(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;

            let types = load_type_registry(&pool)
                .await
                .context("Failed to load content types")?;

            let pool = Arc::new(pool);
            let api = ContentApi::new(
                Arc::new(PgSiteRepository::new(pool.clone())),
                Arc::new(PgPageRepository::new(pool.clone())),
                Arc::new(PgPostRepository::new(pool.clone())),
                Arc::new(PgAliasRepository::new(pool)),
                cache,
            );
            Ok((api, types))
        }
        ContentSource::File(path) => {
            let store = MemoryContentStore::load(path).await?;

            let types = store.seed().type_registry();
            Ok((ContentApi::from_store(Arc::new(store), cache), types))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis cache (or NullCache fallback)
/// - Content store (PostgreSQL with migrations, or a JSON file)
/// - Preview token service
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - The content source cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let cache = connect_cache(&config).await;
    let (content, types) = open_content(&config, cache).await?;

    let preview = PreviewService::new(
        config.preview_signing_secret.clone(),
        config.preview_token_hashes.clone(),
    );

    let state = AppState::new(content, types, config.cache_settings(), preview);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
