//! Durable cache store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::entry::CacheEntry;
use crate::domain::RagError;

/// Durable second-tier cache
///
/// Implementations must distinguish an absent key (`Ok(None)`) from an
/// unreachable medium (`Err(RagError::StorageUnavailable)`). Entries written
/// through `put` must survive a process restart.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Looks up the entry stored under the exact key
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, RagError>;

    /// Inserts or overwrites the entry, refreshing its timestamp
    async fn put(&self, key: &str, value: &str) -> Result<(), RagError>;

    /// Number of stored entries
    async fn len(&self) -> Result<usize, RagError>;

    /// Verifies the medium is reachable
    async fn health_check(&self) -> Result<(), RagError> {
        self.len().await.map(|_| ())
    }

    /// Backend name used in logs and health output
    fn store_type(&self) -> &'static str;
}
