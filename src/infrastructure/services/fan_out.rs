//! Concurrent resolution of many keys through the orchestrator

use futures::stream::{self, StreamExt};

use super::orchestrator::{CacheOrchestrator, Resolution};
use crate::domain::RagError;

/// One unit of fan-out work
#[derive(Debug, Clone)]
pub struct WorkItem<T> {
    pub identity: T,
    pub prompt: String,
}

impl<T> WorkItem<T> {
    pub fn new(identity: T, prompt: impl Into<String>) -> Self {
        Self {
            identity,
            prompt: prompt.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FanOutResult<T> {
    pub identity: T,
    pub result: Result<Resolution, RagError>,
}

/// Resolves independent work items concurrently, preserving input order
#[derive(Debug, Clone)]
pub struct FanOutCoordinator {
    orchestrator: CacheOrchestrator,
    max_concurrency: Option<usize>,
}

impl FanOutCoordinator {
    /// Unbounded coordinator
    pub fn new(orchestrator: CacheOrchestrator) -> Self {
        Self {
            orchestrator,
            max_concurrency: None,
        }
    }

    /// Caps how many items resolve at once; `0` is treated as `1`
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// A failing item never cancels its siblings; its error is returned in place
    pub async fn resolve_all<T>(&self, items: Vec<WorkItem<T>>) -> Vec<FanOutResult<T>> {
        let total = items.len();
        let resolve = |item: WorkItem<T>| {
            let orchestrator = self.orchestrator.clone();
            async move {
                let result = orchestrator.resolve(&item.prompt).await;
                FanOutResult {
                    identity: item.identity,
                    result,
                }
            }
        };

        let results: Vec<FanOutResult<T>> = match self.max_concurrency {
            Some(limit) => {
                stream::iter(items)
                    .map(resolve)
                    .buffered(limit)
                    .collect()
                    .await
            }
            None => futures::future::join_all(items.into_iter().map(resolve)).await,
        };

        let failures = results.iter().filter(|r| r.result.is_err()).count();
        if failures > 0 {
            tracing::warn!(total, failures, "Fan-out completed with failures");
        } else {
            tracing::debug!(total, "Fan-out completed");
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::cache::MockCacheStore;
    use crate::domain::generation::MockGenerator;
    use crate::domain::retrieval::MockRetriever;
    use crate::infrastructure::cache::{EvictionPolicy, L1Cache};
    use crate::infrastructure::services::RagPipeline;

    fn orchestrator(generator: Arc<MockGenerator>) -> CacheOrchestrator {
        CacheOrchestrator::new(
            L1Cache::new(100, EvictionPolicy::Fifo).unwrap(),
            Arc::new(MockCacheStore::new()),
            RagPipeline::new(Arc::new(MockRetriever::new()), generator),
        )
    }

    fn items(prompts: &[&str]) -> Vec<WorkItem<usize>> {
        prompts
            .iter()
            .enumerate()
            .map(|(i, p)| WorkItem::new(i, *p))
            .collect()
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_order() {
        let generator = Arc::new(
            MockGenerator::new("fallback")
                .with_rule("first", "one")
                .with_rule("third", "three")
                .failing_on("second"),
        );
        let coordinator = FanOutCoordinator::new(orchestrator(generator));

        let results = coordinator
            .resolve_all(items(&["first", "second", "third"]))
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].identity, 0);
        assert_eq!(results[0].result.as_ref().unwrap().value, "one");
        assert!(matches!(
            results[1].result,
            Err(RagError::GenerationUnavailable { .. })
        ));
        assert_eq!(results[2].result.as_ref().unwrap().value, "three");
    }

    #[tokio::test]
    async fn test_bounded_concurrency() {
        let generator = Arc::new(MockGenerator::new("done").with_delay(Duration::from_millis(30)));
        let coordinator = FanOutCoordinator::new(orchestrator(generator.clone())).with_max_concurrency(2);

        let results = coordinator
            .resolve_all(items(&["a", "b", "c", "d", "e"]))
            .await;

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.result.is_ok()));
        assert_eq!(generator.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_unbounded_runs_all_at_once() {
        let generator = Arc::new(MockGenerator::new("done").with_delay(Duration::from_millis(30)));
        let coordinator = FanOutCoordinator::new(orchestrator(generator.clone()));

        let results = coordinator.resolve_all(items(&["a", "b", "c", "d"])).await;

        assert_eq!(results.len(), 4);
        assert_eq!(generator.max_in_flight(), 4);
    }

    /// Earlier items are slower, so they complete last
    fn reverse_finishing_generator(labels: &[String]) -> Arc<MockGenerator> {
        let slowest = labels.len() as u64;
        let generator = labels.iter().enumerate().fold(MockGenerator::new("x"), |g, (i, label)| {
            g.with_rule(label.as_str(), format!("analysis of {}", label))
                .with_rule_delay(label.as_str(), Duration::from_millis(10 * (slowest - i as u64)))
        });
        Arc::new(generator)
    }

    async fn assert_input_order(coordinator: FanOutCoordinator, labels: Vec<String>) {
        let work = labels
            .iter()
            .map(|l| WorkItem::new(l.clone(), l.clone()))
            .collect();

        let results = coordinator.resolve_all(work).await;

        let identities: Vec<String> = results.iter().map(|r| r.identity.clone()).collect();
        assert_eq!(identities, labels);
        for outcome in &results {
            assert_eq!(
                outcome.result.as_ref().unwrap().value,
                format!("analysis of {}", outcome.identity)
            );
        }
    }

    #[tokio::test]
    async fn test_order_independent_of_completion_bounded() {
        let labels: Vec<String> = (0..6).map(|i| format!("update {}", i)).collect();
        let generator = reverse_finishing_generator(&labels);
        let coordinator = FanOutCoordinator::new(orchestrator(generator.clone())).with_max_concurrency(3);

        assert_input_order(coordinator, labels).await;
        assert_eq!(generator.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn test_order_independent_of_completion_unbounded() {
        let labels: Vec<String> = (0..6).map(|i| format!("update {}", i)).collect();
        let generator = reverse_finishing_generator(&labels);
        let coordinator = FanOutCoordinator::new(orchestrator(generator.clone()));

        assert_input_order(coordinator, labels).await;
        assert_eq!(generator.max_in_flight(), 6);
    }

    #[tokio::test]
    async fn test_duplicate_prompts_share_one_run() {
        let generator = Arc::new(MockGenerator::new("same").with_delay(Duration::from_millis(30)));
        let coordinator = FanOutCoordinator::new(orchestrator(generator.clone()));

        let results = coordinator
            .resolve_all(items(&["gas leak", "gas leak", "gas leak"]))
            .await;

        assert!(results.iter().all(|r| r.result.as_ref().unwrap().value == "same"));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let coordinator = FanOutCoordinator::new(orchestrator(Arc::new(MockGenerator::new("x"))));

        let results = coordinator.resolve_all(Vec::<WorkItem<()>>::new()).await;
        assert!(results.is_empty());
    }
}
