//! Infrastructure layer - External service implementations

pub mod cache;
pub mod llm;
pub mod logging;
pub mod report;
pub mod retrieval;
pub mod services;
pub mod updates;
