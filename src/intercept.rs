//! Interception side of the service: decides which observed responses are
//! worth indexing and feeds them to the pipeline without ever blocking the
//! host proxy's response delivery.

use crate::config::FilterSettings;
use crate::pipeline::EmbedPipeline;

/// One completed request/response exchange as reported by the host proxy.
/// Ephemeral; consumed by the filter and never stored.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ObservedResponse {
    pub url: String,
    pub host: String,
    pub method: String,
    pub status_code: u16,
}

/// True when a response is eligible for indexing: a successful plain GET to
/// a non-local, non-loopback host.
pub fn is_indexable(response: &ObservedResponse, local_suffix: &str) -> bool {
    if response.host.ends_with(local_suffix) {
        return false;
    }
    if response.host == "localhost" || response.host == "127.0.0.1" {
        return false;
    }
    if response.method != "GET" {
        return false;
    }
    response.status_code == 200
}

/// Hook handed to the host proxy; call [`Interceptor::observe`] once per
/// completed response.
#[derive(Clone)]
pub struct Interceptor {
    pipeline: EmbedPipeline,
    local_suffix: String,
}

impl Interceptor {
    pub fn new(pipeline: EmbedPipeline, filter: &FilterSettings) -> Self {
        Interceptor {
            pipeline,
            local_suffix: filter.local_suffix.clone(),
        }
    }

    /// Submits an eligible response for indexing. Ineligible traffic is
    /// skipped silently; a full queue drops the URL with a warning. Either
    /// way the caller's response path is never delayed.
    pub fn observe(&self, response: ObservedResponse) {
        if !is_indexable(&response, &self.local_suffix) {
            tracing::trace!(url = response.url, "skipping ineligible response");
            return;
        }
        self.pipeline.submit(response.url);
    }
}
