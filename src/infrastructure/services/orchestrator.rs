//! Tiered cache orchestration with per-key single-flight
//!
//! Lookup order is L1, then the durable store, then the pipeline. Concurrent
//! misses on one key share a single pipeline run, which executes on its own
//! task so that callers going away never abort it half way.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;

use super::pipeline::RagPipeline;
use crate::domain::{CacheStore, RagError, Tier};
use crate::infrastructure::cache::L1Cache;

/// A resolved answer and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub source: Tier,
    /// Set when the answer was generated but could not be persisted
    pub storage_warning: Option<RagError>,
}

impl Resolution {
    fn cached(value: String, source: Tier) -> Self {
        Self {
            value,
            source,
            storage_warning: None,
        }
    }
}

/// Point-in-time orchestrator counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub pipeline_runs: u64,
    pub pipeline_failures: u64,
    pub coalesced_waiters: u64,
    pub l2_read_failures: u64,
    pub l2_write_failures: u64,
    pub l1_size: usize,
    pub l1_capacity: usize,
    pub in_flight: usize,
}

#[derive(Debug, Default)]
struct Counters {
    l1_hits: AtomicU64,
    l2_hits: AtomicU64,
    pipeline_runs: AtomicU64,
    pipeline_failures: AtomicU64,
    coalesced_waiters: AtomicU64,
    l2_read_failures: AtomicU64,
    l2_write_failures: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Clone)]
struct FlightOutcome {
    value: String,
    storage_warning: Option<RagError>,
}

type Flight = Shared<BoxFuture<'static, Result<FlightOutcome, RagError>>>;

enum Lookup {
    Cached(String),
    Flight(Flight),
}

struct Inner {
    l1: L1Cache,
    l2: Arc<dyn CacheStore>,
    pipeline: RagPipeline,
    in_flight: Mutex<HashMap<String, Flight>>,
    counters: Counters,
}

/// Removes a key's registry entry when its flight task finishes, panics included
struct FlightGuard {
    inner: Arc<Inner>,
    key: String,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight.lock().remove(&self.key);
    }
}

impl Inner {
    async fn execute(&self, key: &str) -> Result<FlightOutcome, RagError> {
        bump(&self.counters.pipeline_runs);

        let result = match self.pipeline.run(key).await {
            Ok(result) => result,
            Err(e) => {
                bump(&self.counters.pipeline_failures);
                tracing::warn!(key_len = key.len(), kind = e.kind(), error = %e, "Pipeline failed");
                return Err(e);
            }
        };

        // L1 only ever holds values the durable store has accepted
        match self.l2.put(key, &result.answer).await {
            Ok(()) => {
                self.l1.put(key, &result.answer);
                tracing::debug!(
                    key_len = key.len(),
                    grounding = ?result.grounding,
                    "Cached pipeline answer"
                );
                Ok(FlightOutcome {
                    value: result.answer,
                    storage_warning: None,
                })
            }
            Err(e) => {
                bump(&self.counters.l2_write_failures);
                tracing::warn!(
                    key_len = key.len(),
                    store = self.l2.store_type(),
                    error = %e,
                    "Durable write failed, answer not cached"
                );
                Ok(FlightOutcome {
                    value: result.answer,
                    storage_warning: Some(e),
                })
            }
        }
    }
}

/// Cloneable handle to the shared tiered cache
#[derive(Clone)]
pub struct CacheOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CacheOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheOrchestrator")
            .field("l1", &self.inner.l1)
            .field("l2", &self.inner.l2.store_type())
            .field("in_flight", &self.inner.in_flight.lock().len())
            .finish()
    }
}

impl CacheOrchestrator {
    pub fn new(l1: L1Cache, l2: Arc<dyn CacheStore>, pipeline: RagPipeline) -> Self {
        Self {
            inner: Arc::new(Inner {
                l1,
                l2,
                pipeline,
                in_flight: Mutex::new(HashMap::new()),
                counters: Counters::default(),
            }),
        }
    }

    pub fn store(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.inner.l2)
    }

    /// Answers `key` from the fastest tier that has it
    ///
    /// Durable store read failures fall back to the pipeline. Pipeline
    /// failures are returned to every waiter and never cached.
    pub async fn resolve(&self, key: &str) -> Result<Resolution, RagError> {
        validate_key(key)?;

        if let Some(entry) = self.inner.l1.get(key) {
            bump(&self.inner.counters.l1_hits);
            tracing::debug!(key_len = key.len(), tier = %Tier::L1, "Cache hit");
            return Ok(Resolution::cached(entry.value, Tier::L1));
        }

        match self.inner.l2.get(key).await {
            Ok(Some(entry)) => {
                bump(&self.inner.counters.l2_hits);
                self.inner.l1.put(key, &entry.value);
                tracing::debug!(key_len = key.len(), tier = %Tier::L2, "Cache hit, promoted");
                return Ok(Resolution::cached(entry.value, Tier::L2));
            }
            Ok(None) => {}
            Err(e) => {
                bump(&self.inner.counters.l2_read_failures);
                tracing::warn!(
                    key_len = key.len(),
                    store = self.inner.l2.store_type(),
                    error = %e,
                    "Durable read failed, falling back to pipeline"
                );
            }
        }

        self.await_flight(key, false).await
    }

    /// Regenerates `key` and overwrites both tiers
    ///
    /// Joins a run that is already in flight instead of starting another.
    pub async fn refresh(&self, key: &str) -> Result<Resolution, RagError> {
        validate_key(key)?;
        tracing::info!(key_len = key.len(), "Refreshing cached answer");
        self.await_flight(key, true).await
    }

    pub fn stats(&self) -> CacheStats {
        let counters = &self.inner.counters;
        CacheStats {
            l1_hits: counters.l1_hits.load(Ordering::Relaxed),
            l2_hits: counters.l2_hits.load(Ordering::Relaxed),
            pipeline_runs: counters.pipeline_runs.load(Ordering::Relaxed),
            pipeline_failures: counters.pipeline_failures.load(Ordering::Relaxed),
            coalesced_waiters: counters.coalesced_waiters.load(Ordering::Relaxed),
            l2_read_failures: counters.l2_read_failures.load(Ordering::Relaxed),
            l2_write_failures: counters.l2_write_failures.load(Ordering::Relaxed),
            l1_size: self.inner.l1.len(),
            l1_capacity: self.inner.l1.capacity(),
            in_flight: self.inner.in_flight.lock().len(),
        }
    }

    async fn await_flight(&self, key: &str, force: bool) -> Result<Resolution, RagError> {
        let flight = match self.lookup_or_start(key, force) {
            Lookup::Cached(value) => return Ok(Resolution::cached(value, Tier::L1)),
            Lookup::Flight(flight) => flight,
        };

        let outcome = flight.await?;
        Ok(Resolution {
            value: outcome.value,
            source: Tier::Pipeline,
            storage_warning: outcome.storage_warning,
        })
    }

    fn lookup_or_start(&self, key: &str, force: bool) -> Lookup {
        let mut in_flight = self.inner.in_flight.lock();

        if let Some(flight) = in_flight.get(key) {
            bump(&self.inner.counters.coalesced_waiters);
            tracing::debug!(key_len = key.len(), "Joining in-flight pipeline run");
            return Lookup::Flight(flight.clone());
        }

        // a flight may have finished between our tier misses and taking the lock
        if !force {
            if let Some(entry) = self.inner.l1.get(key) {
                bump(&self.inner.counters.l1_hits);
                return Lookup::Cached(entry.value);
            }
        }

        let flight = self.start_flight(key);
        in_flight.insert(key.to_string(), flight.clone());
        Lookup::Flight(flight)
    }

    fn start_flight(&self, key: &str) -> Flight {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();

        // the guard is built on first poll; the registry lock is held while spawning
        let handle = tokio::spawn(async move {
            let guard = FlightGuard { inner, key };
            let outcome = guard.inner.execute(&guard.key).await;
            drop(guard);
            outcome
        });

        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(RagError::internal(format!("pipeline task failed: {}", e))),
            }
        }
        .boxed()
        .shared()
    }
}

fn validate_key(key: &str) -> Result<(), RagError> {
    if key.trim().is_empty() {
        return Err(RagError::validation("Query is empty"));
    }
    Ok(())
}
