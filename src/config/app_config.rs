use serde::Deserialize;

use crate::infrastructure::cache::{EvictionPolicy, StoreConfig, StoreType};

/// Environment variable consulted when `generation.api_key` is unset
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub updates: UpdatesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub l1_capacity: usize,
    pub eviction: EvictionPolicy,
    pub store: StoreType,
    pub sqlite_path: String,
    pub postgres_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalBackend {
    /// External search service
    Http,
    /// Local JSON corpus
    #[default]
    Keyword,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub backend: RetrievalBackend,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub corpus_path: String,
    pub top_k: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdatesConfig {
    pub feed_url: String,
    pub default_limit: usize,
    pub max_concurrency: usize,
    pub article_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            l1_capacity: 100,
            eviction: EvictionPolicy::Fifo,
            store: StoreType::Sqlite,
            sqlite_path: "rag_cache.db".to_string(),
            postgres_url: None,
        }
    }
}

impl CacheConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            store_type: self.store.clone(),
            sqlite_path: self.sqlite_path.clone(),
            postgres_url: self.postgres_url.clone(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: RetrievalBackend::default(),
            endpoint: None,
            api_key: None,
            corpus_path: "data/mining_corpus.json".to_string(),
            top_k: 5,
            timeout_secs: 30,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl GenerationConfig {
    /// Configured key, else the `GOOGLE_API_KEY` environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://www.dgms.gov.in/rss".to_string(),
            default_limit: 5,
            max_concurrency: 4,
            article_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
