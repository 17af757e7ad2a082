//! Shared application state injected into middleware and handlers.

use std::sync::Arc;

use crate::application::services::{ContentApi, PreviewService};
use crate::domain::content_types::TypeRegistry;
use crate::pipeline::{CacheSettings, Pipeline};
use crate::routing::RouterEnv;

/// Application state shared across all requests.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentApi>,
    pub types: Arc<TypeRegistry>,
    pub pipeline: Arc<Pipeline>,
    pub preview: Arc<PreviewService>,
}

impl AppState {
    /// Builds the state and the routing pipeline with the default stage order.
    pub fn new(
        content: ContentApi,
        types: TypeRegistry,
        settings: CacheSettings,
        preview: PreviewService,
    ) -> Self {
        let content = Arc::new(content);
        let types = Arc::new(types);
        let env = RouterEnv::new(content.clone(), types.clone());

        Self {
            content,
            types,
            pipeline: Arc::new(Pipeline::new(env, settings)),
            preview: Arc::new(preview),
        }
    }
}
