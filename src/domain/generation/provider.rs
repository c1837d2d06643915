use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::RagError;

/// Trait for generative model backends (Gemini, etc.)
#[async_trait]
pub trait Generator: Send + Sync + Debug {
    /// Generates text for the prompt
    ///
    /// Transport failures and empty or malformed responses are reported as
    /// `RagError::GenerationUnavailable`.
    async fn generate(&self, prompt: &str) -> Result<String, RagError>;

    /// Get the generator name
    fn generator_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock generator answering by prompt substring rules
    #[derive(Debug)]
    pub struct MockGenerator {
        rules: Vec<(String, String)>,
        failures: Vec<String>,
        default_response: String,
        delay: Option<Duration>,
        rule_delays: Vec<(String, Duration)>,
        call_count: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        pub fn new(default_response: impl Into<String>) -> Self {
            Self {
                rules: Vec::new(),
                failures: Vec::new(),
                default_response: default_response.into(),
                delay: None,
                rule_delays: Vec::new(),
                call_count: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Returns `response` when the prompt contains `needle`
        pub fn with_rule(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
            self.rules.push((needle.into(), response.into()));
            self
        }

        /// Fails with `GenerationUnavailable` when the prompt contains `needle`
        pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
            self.failures.push(needle.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Delays prompts containing `needle`, overriding `with_delay`
        pub fn with_rule_delay(mut self, needle: impl Into<String>, delay: Duration) -> Self {
            self.rule_delays.push((needle.into(), delay));
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, RagError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());

            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            let delay = self
                .rule_delays
                .iter()
                .find(|(needle, _)| prompt.contains(needle))
                .map(|(_, delay)| *delay)
                .or(self.delay);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failures.iter().any(|needle| prompt.contains(needle)) {
                return Err(RagError::generation("mock generation failure"));
            }

            let response = self
                .rules
                .iter()
                .find(|(needle, _)| prompt.contains(needle))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| self.default_response.clone());

            Ok(response)
        }

        fn generator_name(&self) -> &'static str {
            "mock"
        }
    }
}
