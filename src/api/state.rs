//! Application state shared by handlers

use std::sync::Arc;

use crate::domain::CacheStore;
use crate::infrastructure::services::{CacheOrchestrator, SafetyService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub safety: Arc<SafetyService>,
}

impl AppState {
    pub fn new(safety: SafetyService) -> Self {
        Self {
            safety: Arc::new(safety),
        }
    }

    pub fn orchestrator(&self) -> &CacheOrchestrator {
        self.safety.orchestrator()
    }

    pub fn store(&self) -> Arc<dyn CacheStore> {
        self.orchestrator().store()
    }
}
