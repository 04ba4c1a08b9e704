//! Page normalization.
//!
//! Visited pages are not parsed locally. Instead a rendering mirror serves a
//! canonical markdown version of any page at
//! `https://<mirror>/<original host><original path>`, usually carrying page
//! attributes as YAML front matter.

use reqwest::Client;
use url::Url;

use crate::config::{NormalizerSettings, USER_AGENT};
use crate::errors::NormalizeError;
use crate::frontmatter::{self, Metadata};

/// A fetched page reduced to text, with whatever attributes the mirror
/// provided. Handed to the dispatcher exactly once, never mutated.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    pub metadata: Option<Metadata>,
    pub content: String,
}

pub struct ContentNormalizer {
    client: Client,
    mirror_host: String,
}

impl ContentNormalizer {
    pub fn new(settings: &NormalizerSettings) -> Result<Self, NormalizeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(settings.fetch_timeout_secs))
            .build()?;
        Ok(ContentNormalizer {
            client,
            mirror_host: settings.mirror_host.clone(),
        })
    }

    /// Fetches the normalized rendering of `url` and splits off its front
    /// matter. Transport errors and non-2xx mirror responses abort the
    /// attempt; a malformed front matter block downgrades to raw content.
    pub async fn normalize(&self, url: &str) -> Result<NormalizedDocument, NormalizeError> {
        let target = rendering_url(url, &self.mirror_host)?;

        let body = self
            .client
            .get(target)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match frontmatter::split(&body) {
            Ok((metadata, content)) => Ok(NormalizedDocument { metadata, content }),
            Err(err) => {
                tracing::warn!(url, error = %err, "malformed front matter, keeping raw content");
                Ok(NormalizedDocument {
                    metadata: None,
                    content: body,
                })
            }
        }
    }
}

/// Derives the mirror URL for a page: scheme and query survive, the fragment
/// is dropped, and the original authority becomes the first path segment.
/// The mirror may carry its own port (`host` or `host:port`).
pub fn rendering_url(raw: &str, mirror_host: &str) -> Result<Url, NormalizeError> {
    let invalid = |reason: &str| NormalizeError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(raw).map_err(|err| invalid(&err.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| invalid("missing host"))?;

    let authority = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let mut target = format!(
        "{}://{}/{}{}",
        parsed.scheme(),
        mirror_host,
        authority,
        parsed.path()
    );
    if let Some(query) = parsed.query() {
        target.push('?');
        target.push_str(query);
    }

    Url::parse(&target).map_err(|err| invalid(&err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_path_with_original_host() {
        let url = rendering_url("https://example.com/a/b", "pure.md").unwrap();
        assert_eq!(url.as_str(), "https://pure.md/example.com/a/b");
    }

    #[test]
    fn keeps_query_and_drops_fragment() {
        let url = rendering_url("https://example.com/a?page=2#section", "pure.md").unwrap();
        assert_eq!(url.as_str(), "https://pure.md/example.com/a?page=2");
    }

    #[test]
    fn keeps_original_port_in_path_segment() {
        let url = rendering_url("http://example.com:8080/x", "pure.md").unwrap();
        assert_eq!(url.as_str(), "http://pure.md/example.com:8080/x");
    }

    #[test]
    fn bare_host_maps_to_root_path() {
        let url = rendering_url("https://example.com", "pure.md").unwrap();
        assert_eq!(url.as_str(), "https://pure.md/example.com/");
    }

    #[test]
    fn mirror_host_may_carry_a_port() {
        let url = rendering_url("http://example.com/a", "127.0.0.1:9099").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9099/example.com/a");
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(rendering_url("not a url", "pure.md").is_err());
    }
}
