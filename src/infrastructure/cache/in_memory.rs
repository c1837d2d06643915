//! Process-local store for development and tests
//!
//! Implements the durable-store contract without durability: entries are lost
//! on restart. Selected with `cache.store = "in_memory"`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{CacheEntry, CacheStore, RagError};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, RagError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), RagError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry::new(key, value));
        Ok(())
    }

    async fn len(&self) -> Result<usize, RagError> {
        Ok(self.entries.read().await.len())
    }

    fn store_type(&self) -> &'static str {
        "in_memory"
    }
}
