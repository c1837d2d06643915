//! Domain layer - Core types, errors and collaborator traits

pub mod cache;
pub mod error;
pub mod generation;
pub mod report;
pub mod retrieval;
pub mod updates;

pub use cache::{CacheEntry, CacheStore, Tier};
pub use error::RagError;
pub use generation::Generator;
pub use report::{AuditReportRequest, ReportComposer, ReportDocument};
pub use retrieval::Retriever;
pub use updates::{AnalyzedUpdate, ArticleFetcher, UpdateFeed, UpdateItem};
