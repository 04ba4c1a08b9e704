//! Query side: similarity search against the engine, reconstruction of each
//! hit into a renderable document, and population of the result cache.

use std::sync::Arc;

use serde::Serialize;

use crate::cache::ResultCache;
use crate::engine::{IndexBackend, SearchHit};
use crate::errors::ApiError;
use crate::frontmatter;

/// One search result ready for rendering, in the engine's rank order.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedResult {
    pub id: String,
    pub score: f64,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl RenderedResult {
    /// Score rounded for display.
    pub fn display_score(&self) -> String {
        format!("{:.3}", self.score)
    }

    /// Link label: the page title when the hit carried one, else the id.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn IndexBackend>,
    cache: ResultCache,
    collection: String,
}

impl SearchService {
    pub fn new(backend: Arc<dyn IndexBackend>, cache: ResultCache, collection: String) -> Self {
        SearchService {
            backend,
            cache,
            collection,
        }
    }

    /// Runs a similarity query and reconstructs each hit. Every hit's full
    /// document is cached under its id (overwriting), so the caller can serve
    /// it later. A blank query or zero hits is an empty listing, not an
    /// error; the engine is never asked to embed an empty string.
    pub async fn search(&self, query: &str) -> Result<Vec<RenderedResult>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.backend.similar(query, &self.collection).await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let document = render_document(&hit)?;
            self.cache.put(&hit.id, document);
            results.push(render_result(hit));
        }
        Ok(results)
    }
}

/// Full document for a hit: front matter and content recombined when the hit
/// carries metadata, raw content verbatim otherwise.
fn render_document(hit: &SearchHit) -> Result<String, ApiError> {
    match hit.metadata.as_ref().filter(|m| !m.is_empty()) {
        Some(metadata) => frontmatter::compose(metadata, &hit.content).map_err(ApiError::internal),
        None => Ok(hit.content.clone()),
    }
}

fn render_result(hit: SearchHit) -> RenderedResult {
    let metadata = hit.metadata.as_ref().filter(|m| !m.is_empty());
    let title = metadata
        .and_then(|m| m.get("title"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let description = metadata
        .and_then(|m| m.get("description"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    RenderedResult {
        id: hit.id,
        score: hit.score,
        title,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndexingJob;
    use crate::errors::EngineError;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedBackend {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl IndexBackend for FixedBackend {
        async fn store(&self, _job: IndexingJob) -> Result<(), EngineError> {
            Ok(())
        }

        async fn similar(
            &self,
            _query: &str,
            _collection: &str,
        ) -> Result<Vec<SearchHit>, EngineError> {
            Ok(self.hits.clone())
        }
    }

    fn service(hits: Vec<SearchHit>) -> (SearchService, ResultCache) {
        let cache = ResultCache::new();
        let service = SearchService::new(
            Arc::new(FixedBackend { hits }),
            cache.clone(),
            "visited".to_string(),
        );
        (service, cache)
    }

    fn hit(id: &str, score: f64, metadata: Option<serde_json::Value>, content: &str) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            score,
            metadata: metadata.map(|m| m.as_object().unwrap().clone()),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn results_keep_engine_order_and_count() {
        let (service, _) = service(vec![
            hit("https://example.com/b", 0.4, None, "B"),
            hit("https://example.com/a", 0.9, None, "A"),
        ]);

        let results = service.search("anything").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "https://example.com/b");
        assert_eq!(results[1].id, "https://example.com/a");
    }

    #[tokio::test]
    async fn scores_render_to_three_decimals() {
        let (service, _) = service(vec![hit(
            "https://example.com/a",
            0.912345,
            Some(json!({"title": "A"})),
            "Hello",
        )]);

        let results = service.search("hello").await.unwrap();
        assert_eq!(results[0].display_score(), "0.912");
        assert_eq!(results[0].label(), "A");
    }

    #[tokio::test]
    async fn metadata_hit_is_cached_recombined() {
        let (service, cache) = service(vec![hit(
            "https://example.com/a",
            0.9,
            Some(json!({"title": "A"})),
            "Hello",
        )]);

        service.search("hello").await.unwrap();

        let cached = cache.get("https://example.com/a").unwrap();
        let (metadata, content) = frontmatter::split(&cached).unwrap();
        assert_eq!(
            metadata.unwrap().get("title"),
            Some(&serde_json::Value::String("A".to_string()))
        );
        assert_eq!(content, "Hello");
    }

    #[tokio::test]
    async fn bare_hit_is_cached_verbatim_and_labelled_by_id() {
        let (service, cache) = service(vec![hit("https://example.com/a", 0.9, None, "Hello")]);

        let results = service.search("hello").await.unwrap();
        assert_eq!(results[0].label(), "https://example.com/a");
        assert!(results[0].description.is_none());
        assert_eq!(cache.get("https://example.com/a").as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn description_comes_from_metadata() {
        let (service, _) = service(vec![hit(
            "https://example.com/a",
            0.9,
            Some(json!({"title": "A", "description": "About A"})),
            "Hello",
        )]);

        let results = service.search("hello").await.unwrap();
        assert_eq!(results[0].description.as_deref(), Some("About A"));
    }

    #[tokio::test]
    async fn repeated_search_overwrites_cache_entry() {
        let cache = ResultCache::new();
        let first = SearchService::new(
            Arc::new(FixedBackend {
                hits: vec![hit("id", 0.5, None, "old")],
            }),
            cache.clone(),
            "visited".to_string(),
        );
        let second = SearchService::new(
            Arc::new(FixedBackend {
                hits: vec![hit("id", 0.5, None, "new")],
            }),
            cache.clone(),
            "visited".to_string(),
        );

        first.search("q").await.unwrap();
        second.search("q").await.unwrap();
        assert_eq!(cache.get("id").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn blank_query_never_reaches_the_backend() {
        let (service, cache) = service(vec![hit("https://example.com/a", 0.9, None, "Hello")]);

        assert!(service.search("").await.unwrap().is_empty());
        assert!(service.search("   \t").await.unwrap().is_empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn zero_hits_is_an_empty_listing() {
        let (service, cache) = service(vec![]);
        let results = service.search("nothing matches").await.unwrap();
        assert!(results.is_empty());
        assert!(cache.is_empty());
    }
}
