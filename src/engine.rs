//! External embedding engine interface.
//!
//! The engine owns all durable storage and similarity computation; this
//! service only speaks its CLI convention. The seam is a trait so the search
//! and pipeline paths can run against a mock in tests.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::EngineSettings;
use crate::errors::EngineError;
use crate::frontmatter::Metadata;

/// One document handed to the engine for embedding and storage. The URL
/// doubles as the engine-side document id.
#[derive(Debug, Clone)]
pub struct IndexingJob {
    pub url: String,
    pub model: String,
    pub collection: String,
    pub metadata: Option<Metadata>,
    pub content: String,
}

/// One ranked match returned by a similarity query.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    pub content: String,
}

#[async_trait]
pub trait IndexBackend: Send + Sync {
    /// Embeds and stores one document. The caller treats any failure as a
    /// lost indexing attempt; there is no retry contract.
    async fn store(&self, job: IndexingJob) -> Result<(), EngineError>;

    /// Runs a similarity query against a collection, returning hits in the
    /// engine's own rank order.
    async fn similar(&self, query: &str, collection: &str) -> Result<Vec<SearchHit>, EngineError>;
}

/// Backend speaking the `llm` CLI convention: content over stdin for stores,
/// line-delimited JSON records on stdout for queries.
pub struct LlmCli {
    binary: String,
    query_timeout: Duration,
}

impl LlmCli {
    pub fn new(settings: &EngineSettings) -> Self {
        LlmCli {
            binary: settings.binary.clone(),
            query_timeout: Duration::from_secs(settings.query_timeout_secs),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl IndexBackend for LlmCli {
    async fn store(&self, job: IndexingJob) -> Result<(), EngineError> {
        let mut cmd = self.command();
        cmd.arg("embed")
            .arg("--model")
            .arg(&job.model)
            .arg("--input")
            .arg("-")
            .arg("--store");
        if let Some(metadata) = &job.metadata {
            cmd.arg("--metadata").arg(serde_json::to_string(metadata)?);
        }
        cmd.arg(&job.collection).arg(&job.url);
        cmd.stdin(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| EngineError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(job.content.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(EngineError::NonZeroExit(output.status));
        }
        Ok(())
    }

    async fn similar(&self, query: &str, collection: &str) -> Result<Vec<SearchHit>, EngineError> {
        let mut cmd = self.command();
        cmd.arg("similar").arg("-c").arg(query).arg(collection);

        let child = cmd.spawn().map_err(|source| EngineError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        let output = tokio::time::timeout(self.query_timeout, child.wait_with_output())
            .await
            .map_err(|_| EngineError::Timeout(self.query_timeout))??;

        if !output.status.success() {
            return Err(EngineError::NonZeroExit(output.status));
        }

        parse_hits(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses the engine's line-delimited JSON hit records. Blank lines are
/// skipped; a record whose `metadata` is JSON null carries no metadata.
pub fn parse_hits(stdout: &str) -> Result<Vec<SearchHit>, EngineError> {
    let mut hits = Vec::new();
    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }
        hits.push(serde_json::from_str(line)?);
    }
    Ok(hits)
}
