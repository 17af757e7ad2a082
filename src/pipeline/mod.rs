//! Request routing pipeline.
//!
//! The pipeline is an explicit, ordered list of [`Stage`]s run against a
//! [`RequestContext`]. Each stage either lets the request continue (possibly
//! after recording a rewrite) or terminates it with a response of its own:
//! an alias or content redirect, a `304 Not Modified`, or the sitemap.
//!
//! The default order is:
//!
//! ```text
//! Alias -> Page -> Post -> Archive -> StartPage -> Sitemap
//! ```
//!
//! Site resolution runs before the pipeline, in [`layer::rewrite`].

pub mod context;
pub mod layer;
pub mod stages;

use async_trait::async_trait;
use axum::response::Response;
use tracing::debug;

use crate::error::AppError;
use crate::routing::RouterEnv;
use context::RequestContext;
use stages::{AliasStage, ArchiveStage, PageStage, PostStage, SitemapStage, StartPageStage};

/// Path prefixes the pipeline never routes. A prefix matches whole segments
/// only: `/health` covers `/health` and `/health/live`, not `/healthy-eating`.
pub const PASSTHROUGH_PREFIXES: &[&str] = &["/api", "/health", "/static", "/manager"];

/// Outcome of a stage.
pub enum Flow {
    Continue,
    Terminate(Response),
}

/// One step of the routing pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AppError>;
}

/// HTTP cache header settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// When `false`, no conditional checks are made and no cache headers are sent.
    pub enabled: bool,
    /// Page expiry in minutes; `0` disables public caching of pages.
    pub expires_pages: i64,
    /// Post expiry in minutes; `0` disables public caching of posts.
    pub expires_posts: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            expires_pages: 0,
            expires_posts: 0,
        }
    }
}

/// The ordered routing stages.
pub struct Pipeline {
    env: RouterEnv,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Creates the pipeline with the default stage order.
    pub fn new(env: RouterEnv, settings: CacheSettings) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(AliasStage::new(env.clone())),
            Box::new(PageStage::new(env.clone(), settings)),
            Box::new(PostStage::new(env.clone(), settings)),
            Box::new(ArchiveStage::new(env.clone(), settings)),
            Box::new(StartPageStage::new(env.clone(), settings)),
            Box::new(SitemapStage::new(env.clone())),
        ];
        Self::with_stages(env, stages)
    }

    /// Creates a pipeline with a custom stage list.
    pub fn with_stages(env: RouterEnv, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { env, stages }
    }

    pub fn env(&self) -> &RouterEnv {
        &self.env
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs the stages in order until one terminates.
    ///
    /// Stages are skipped once the request is handled.
    ///
    /// # Errors
    ///
    /// Propagates the first stage error.
    pub async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AppError> {
        for stage in &self.stages {
            if ctx.is_handled() {
                debug!(stage = stage.name(), "Request already handled, skipping");
                continue;
            }
            if let Flow::Terminate(response) = stage.run(ctx).await? {
                return Ok(Flow::Terminate(response));
            }
        }
        Ok(Flow::Continue)
    }
}

/// `true` for paths the pipeline must leave alone.
pub fn is_passthrough(path: &str) -> bool {
    PASSTHROUGH_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}
