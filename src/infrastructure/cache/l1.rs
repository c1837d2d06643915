//! Bounded in-memory first tier

use std::num::NonZeroUsize;
use std::str::FromStr;

use lru::LruCache;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::domain::{CacheEntry, RagError};

/// Order in which entries leave a full L1 tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum EvictionPolicy {
    /// Evict the earliest inserted entry; reads never reorder
    #[default]
    Fifo,
    /// Evict the least recently read or written entry
    Lru,
}

impl FromStr for EvictionPolicy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            _ => Err(RagError::configuration(format!(
                "Unknown eviction policy: {}. Valid policies: fifo, lru",
                s
            ))),
        }
    }
}

impl TryFrom<String> for EvictionPolicy {
    type Error = RagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Capacity-bounded in-memory cache
///
/// Insert and evict happen under one lock, so readers never see the store
/// above capacity or between removing the victim and inserting the new entry.
#[derive(Debug)]
pub struct L1Cache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    policy: EvictionPolicy,
}

impl L1Cache {
    /// Creates a tier holding at most `capacity` entries
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self, RagError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| RagError::configuration("L1 capacity must be greater than zero"))?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            policy,
        })
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let mut entries = self.entries.lock();

        let entry = match self.policy {
            EvictionPolicy::Fifo => entries.peek(key),
            EvictionPolicy::Lru => entries.get(key),
        };

        entry.cloned()
    }

    /// Inserts or overwrites; a new key at capacity evicts exactly one entry
    ///
    /// Overwriting keeps the key's position under FIFO.
    pub fn put(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        let entry = CacheEntry::new(key, value);

        if let Some(existing) = entries.peek_mut(key) {
            *existing = entry;

            if self.policy == EvictionPolicy::Lru {
                entries.promote(key);
            }

            return;
        }

        if let Some((evicted, _)) = entries.push(key.to_string(), entry) {
            tracing::debug!(evicted_len = evicted.len(), "Evicted L1 entry");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fifo(capacity: usize) -> L1Cache {
        L1Cache::new(capacity, EvictionPolicy::Fifo).unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let cache = fifo(2);
        cache.put("gas leak risk", "Risk: High");

        let entry = cache.get("gas leak risk").unwrap();
        assert_eq!(entry.value, "Risk: High");
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = L1Cache::new(0, EvictionPolicy::Fifo);
        assert!(matches!(result, Err(RagError::Configuration { .. })));
    }

    #[test]
    fn test_overflow_evicts_earliest_inserted() {
        let cache = fifo(3);

        for key in ["a", "b", "c", "d"] {
            cache.put(key, key);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("d"));
    }

    #[test]
    fn test_fifo_reads_do_not_change_eviction_order() {
        let cache = fifo(2);
        cache.put("a", "1");
        cache.put("b", "2");

        // Reading "a" must not save it from eviction
        assert!(cache.get("a").is_some());
        cache.put("c", "3");

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_fifo_overwrite_keeps_position_and_size() {
        let cache = fifo(2);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("a", "updated");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().value, "updated");

        cache.put("c", "3");
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn test_lru_reads_protect_entries() {
        let cache = L1Cache::new(2, EvictionPolicy::Lru).unwrap();
        cache.put("a", "1");
        cache.put("b", "2");

        assert!(cache.get("a").is_some());
        cache.put("c", "3");

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_eviction_policy_from_str() {
        assert_eq!("FIFO".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Fifo);
        assert_eq!("lru".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert!("random".parse::<EvictionPolicy>().is_err());
    }

    #[test]
    fn test_concurrent_puts_never_exceed_capacity() {
        let cache = std::sync::Arc::new(fifo(8));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        cache.put(&format!("{}-{}", t, i), "v");
                        assert!(cache.len() <= 8);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 8);
        assert_eq!(cache.capacity(), 8);
    }
}
