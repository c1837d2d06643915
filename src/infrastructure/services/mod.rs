//! Infrastructure services

mod fan_out;
mod orchestrator;
mod pipeline;
mod safety_service;

pub use fan_out::{FanOutCoordinator, FanOutResult, WorkItem};
pub use orchestrator::{CacheOrchestrator, CacheStats, Resolution};
pub use pipeline::{build_prompt, Grounding, PipelineResult, RagPipeline, DEFAULT_TOP_K};
pub use safety_service::{RenderedReport, SafetyService, DEFAULT_UPDATE_LIMIT};
