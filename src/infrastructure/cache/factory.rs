//! Durable store factory for runtime selection

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{CacheStore, RagError};

use super::in_memory::InMemoryStore;
use super::postgres::{PostgresConfig, PostgresStore};
use super::sqlite::{SqliteConfig, SqliteStore};

/// Supported durable store backends
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StoreType {
    /// Local SQLite file
    #[default]
    Sqlite,
    /// PostgreSQL database
    Postgres,
    /// Non-durable, process-local map
    InMemory,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Sqlite => write!(f, "sqlite"),
            StoreType::Postgres => write!(f, "postgres"),
            StoreType::InMemory => write!(f, "in_memory"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreType::Sqlite),
            "postgres" | "postgresql" => Ok(StoreType::Postgres),
            "in_memory" | "inmemory" | "memory" => Ok(StoreType::InMemory),
            _ => Err(RagError::configuration(format!(
                "Unknown store type: {}. Valid types: sqlite, postgres, in_memory",
                s
            ))),
        }
    }
}

impl TryFrom<String> for StoreType {
    type Error = RagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Configuration for the store factory
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub store_type: StoreType,
    /// SQLite database path
    pub sqlite_path: String,
    /// PostgreSQL URL (required for the Postgres type)
    pub postgres_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Sqlite,
            sqlite_path: SqliteConfig::default().path,
            postgres_url: None,
        }
    }
}

impl StoreConfig {
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            store_type: StoreType::Sqlite,
            sqlite_path: path.into(),
            ..Default::default()
        }
    }

    pub fn postgres(url: impl Into<String>) -> Self {
        Self {
            store_type: StoreType::Postgres,
            postgres_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            store_type: StoreType::InMemory,
            ..Default::default()
        }
    }
}

/// Factory for creating durable store instances
#[derive(Debug, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates the configured store, opening connections eagerly
    pub async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn CacheStore>, RagError> {
        match config.store_type {
            StoreType::Sqlite => {
                let store = SqliteStore::connect(&SqliteConfig::new(&config.sqlite_path)).await?;
                Ok(Arc::new(store))
            }
            StoreType::Postgres => {
                let url = config.postgres_url.clone().ok_or_else(|| {
                    RagError::configuration("PostgreSQL URL is required for the postgres store")
                })?;

                let store = PostgresStore::connect(&PostgresConfig::new(url)).await?;
                Ok(Arc::new(store))
            }
            StoreType::InMemory => Ok(Arc::new(InMemoryStore::new())),
        }
    }
}
