use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::RagError;

/// Trait for document retrieval backends
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    /// Returns up to `k` documents ordered by relevance
    ///
    /// Failures are reported as `RagError::RetrievalUnavailable`.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, RagError>;

    /// Get the retriever name
    fn retriever_name(&self) -> &'static str;
}
