//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, GenerationConfig, LogFormat, LoggingConfig, RetrievalBackend,
    RetrievalConfig, ServerConfig, UpdatesConfig, API_KEY_ENV,
};
