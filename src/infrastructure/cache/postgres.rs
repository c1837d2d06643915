//! PostgreSQL durable store with connection pooling

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::{CacheEntry, CacheStore, RagError};

/// PostgreSQL store configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    pub table_name: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/mine_safety".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            table_name: "cache".to_string(),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// Durable cache table shared by several service instances
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    table_name: String,
}

impl PostgresStore {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    /// Connects a pool and ensures the cache table exists
    pub async fn connect(config: &PostgresConfig) -> Result<Self, RagError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| RagError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let store = Self::new(pool, config.table_name.clone());
        store.ensure_table().await?;

        Ok(store)
    }

    async fn ensure_table(&self) -> Result<(), RagError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                query TEXT PRIMARY KEY,
                response TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
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
}

#[async_trait]
impl CacheStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, RagError> {
        let query = format!(
            "SELECT response, timestamp FROM {} WHERE query = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RagError::storage(format!("Failed to read cache entry: {}", e)))?;

        match row {
            Some(row) => {
                let value: String = row.try_get("response").map_err(|e| {
                    RagError::storage(format!("Failed to decode cache value: {}", e))
                })?;
                let created_at: DateTime<Utc> = row.try_get("timestamp").map_err(|e| {
                    RagError::storage(format!("Failed to decode cache timestamp: {}", e))
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
            VALUES ($1, $2, NOW())
            ON CONFLICT (query) DO UPDATE SET
                response = EXCLUDED.response,
                timestamp = NOW()
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(key)
            .bind(value)
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
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.table_name, "cache");
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://localhost/test")
            .with_max_connections(20)
            .with_connect_timeout(60);

        assert_eq!(config.url, "postgres://localhost/test");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.connect_timeout_secs, 60);
    }
}
