use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::ResultCache;
use crate::config::Settings;
use crate::engine::{IndexBackend, LlmCli};
use crate::intercept::Interceptor;
use crate::normalize::ContentNormalizer;
use crate::pipeline::EmbedPipeline;
use crate::search::SearchService;

pub struct AppState {
    pub settings: Settings,
    pub interceptor: Interceptor,
    pub pipeline: EmbedPipeline,
    pub search: SearchService,
    pub cache: ResultCache,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires every component once. Must run inside a tokio runtime since it
    /// spawns the embed workers.
    pub fn initialize(settings: Settings) -> anyhow::Result<Arc<Self>> {
        let backend: Arc<dyn IndexBackend> = Arc::new(LlmCli::new(&settings.engine));
        Self::with_backend(settings, backend)
    }

    /// Same wiring with an injected backend, used by tests.
    pub fn with_backend(
        settings: Settings,
        backend: Arc<dyn IndexBackend>,
    ) -> anyhow::Result<Arc<Self>> {
        let normalizer = Arc::new(ContentNormalizer::new(&settings.normalizer)?);
        let pipeline = EmbedPipeline::spawn(
            normalizer,
            backend.clone(),
            settings.engine.clone(),
            &settings.pipeline,
        );
        let interceptor = Interceptor::new(pipeline.clone(), &settings.filter);
        let cache = ResultCache::new();
        let search = SearchService::new(backend, cache.clone(), settings.engine.collection.clone());

        Ok(Arc::new(AppState {
            settings,
            interceptor,
            pipeline,
            search,
            cache,
            started_at: Utc::now(),
        }))
    }
}
