use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// User agent sent on every normalized-rendering fetch.
pub const USER_AGENT: &str = "MyClientSoftware/1.0";

/// Runtime settings for the whole service. Every field has a default so an
/// absent or partial config file still produces a working instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub normalizer: NormalizerSettings,
    pub pipeline: PipelineSettings,
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Executable name or path of the embedding engine CLI.
    pub binary: String,
    /// Embedding model identifier passed to the engine.
    pub model: String,
    /// Collection the embeddings are stored in and queried from.
    pub collection: String,
    /// Upper bound on one similarity query.
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerSettings {
    /// Host (`host` or `host:port`) serving canonical markdown renderings of
    /// arbitrary pages.
    pub mirror_host: String,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub workers: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Hosts ending with this suffix are never indexed.
    pub local_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings::default(),
            engine: EngineSettings::default(),
            normalizer: NormalizerSettings::default(),
            pipeline: PipelineSettings::default(),
            filter: FilterSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8488,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            binary: "llm".to_string(),
            model: "3-large".to_string(),
            collection: "visited".to_string(),
            query_timeout_secs: 60,
        }
    }
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        NormalizerSettings {
            mirror_host: "pure.md".to_string(),
            fetch_timeout_secs: 30,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            workers: 4,
            queue_capacity: 256,
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            local_suffix: ".local".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from the resolved config path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(path)?;
        let settings = serde_yaml::from_str(&contents)?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("VISITED_EMBED_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yml")
}
