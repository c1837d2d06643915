//! SQLite durable store

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::domain::{CacheEntry, CacheStore, RagError};

/// SQLite store configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:`
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    pub table_name: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "rag_cache.db".to_string(),
            max_connections: 4,
            busy_timeout_secs: 5,
            table_name: "cache".to_string(),
        }
    }
}

impl SqliteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Durable cache table in a local SQLite file
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    table_name: String,
}

impl SqliteStore {
    /// Opens (creating if needed) the database and its cache table
    pub async fn connect(config: &SqliteConfig) -> Result<Self, RagError> {
        let options = if config.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| RagError::configuration(format!("Invalid SQLite options: {}", e)))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        }
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        // An in-memory database lives and dies with its single connection
        let pool_options = if config.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RagError::storage(format!("Failed to open SQLite database: {}", e)))?;

        let store = Self {
            pool,
            table_name: config.table_name.clone(),
        };
        store.ensure_table().await?;

        tracing::info!(path = %config.path, table = %store.table_name, "SQLite cache store ready");

        Ok(store)
    }

    /// Ephemeral store for tests and development
    pub async fn in_memory() -> Result<Self, RagError> {
        Self::connect(&SqliteConfig::new(":memory:")).await
    }

    async fn ensure_table(&self) -> Result<(), RagError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                query TEXT PRIMARY KEY,
                response TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| RagError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    /// Closes the pool, flushing pending writes
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, RagError> {
        let query = format!(
            "SELECT query, response, timestamp FROM {} WHERE query = ?",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RagError::storage(format!("Failed to read cache entry: {}", e)))?;

        match row {
            Some(row) => {
                let created_at: DateTime<Utc> = row.try_get("timestamp").map_err(|e| {
                    RagError::storage(format!("Failed to decode cache timestamp: {}", e))
                })?;
                let value: String = row.try_get("response").map_err(|e| {
                    RagError::storage(format!("Failed to decode cache value: {}", e))
                })?;

                Ok(Some(CacheEntry::new(key, value).with_created_at(created_at)))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), RagError> {
        let query = format!(
            r#"
            INSERT INTO {} (query, response, timestamp)
            VALUES (?, ?, ?)
            ON CONFLICT(query) DO UPDATE SET
                response = excluded.response,
                timestamp = excluded.timestamp
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| RagError::storage(format!("Failed to write cache entry: {}", e)))?;

        Ok(())
    }

    async fn len(&self) -> Result<usize, RagError> {
        let query = format!("SELECT COUNT(*) as count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RagError::storage(format!("Failed to count entries: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| RagError::storage(format!("Failed to decode count: {}", e)))?;
        Ok(count as usize)
    }

    fn store_type(&self) -> &'static str {
        "sqlite"
    }
}
