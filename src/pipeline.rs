//! Asynchronous indexing pipeline.
//!
//! Eligible URLs are queued onto a bounded channel and drained by a fixed
//! pool of workers; each job fetches the normalized rendering and hands the
//! result to the embedding engine. The whole path is fire-and-forget: a
//! failed fetch or store loses that one attempt and nothing else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::config::{EngineSettings, PipelineSettings};
use crate::engine::{IndexBackend, IndexingJob};
use crate::normalize::{ContentNormalizer, NormalizedDocument};

/// Builds the engine job for one normalized page. Empty metadata maps are
/// treated the same as absent metadata.
pub fn build_job(url: &str, document: NormalizedDocument, engine: &EngineSettings) -> IndexingJob {
    let metadata = document.metadata.filter(|m| !m.is_empty());
    IndexingJob {
        url: url.to_string(),
        model: engine.model.clone(),
        collection: engine.collection.clone(),
        metadata,
        content: document.content,
    }
}

/// Handle to the worker pool. Cloneable; all clones feed the same queue.
#[derive(Clone)]
pub struct EmbedPipeline {
    tx: mpsc::Sender<String>,
    submitted: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl EmbedPipeline {
    /// Spawns the worker pool onto the current runtime.
    pub fn spawn(
        normalizer: Arc<ContentNormalizer>,
        backend: Arc<dyn IndexBackend>,
        engine: EngineSettings,
        settings: &PipelineSettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<String>(settings.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..settings.workers.max(1) {
            let rx = rx.clone();
            let normalizer = normalizer.clone();
            let backend = backend.clone();
            let engine = engine.clone();
            tokio::spawn(async move {
                loop {
                    let url = { rx.lock().await.recv().await };
                    let Some(url) = url else { break };
                    embed_one(&url, &normalizer, backend.as_ref(), &engine).await;
                }
                tracing::debug!(worker, "embed worker stopped");
            });
        }

        EmbedPipeline {
            tx,
            submitted: Arc::new(AtomicU64::new(0)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Queues one URL for indexing without blocking. Returns false when the
    /// queue is full and the URL was dropped.
    pub fn submit(&self, url: String) -> bool {
        match self.tx.try_send(url) {
            Ok(()) => {
                self.submitted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Full(url)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(url, dropped, "embed queue full, dropping");
                false
            }
            Err(mpsc::error::TrySendError::Closed(url)) => {
                tracing::warn!(url, "embed pipeline stopped, dropping");
                false
            }
        }
    }

    /// URLs accepted onto the queue so far.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    /// URLs dropped so far because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn embed_one(
    url: &str,
    normalizer: &ContentNormalizer,
    backend: &dyn IndexBackend,
    engine: &EngineSettings,
) {
    let document = match normalizer.normalize(url).await {
        Ok(document) => document,
        Err(err) => {
            tracing::debug!(url, error = %err, "normalization failed, skipping");
            return;
        }
    };

    let job = build_job(url, document, engine);
    if let Err(err) = backend.store(job).await {
        tracing::debug!(url, error = %err, "engine store failed, dropping");
    }
}
