use async_trait::async_trait;
use std::fmt::Debug;

use super::item::UpdateItem;
use crate::domain::RagError;

/// Source of recent safety updates
#[async_trait]
pub trait UpdateFeed: Send + Sync + Debug {
    /// Fetches at most `limit` updates, newest first as published
    async fn fetch(&self, limit: usize) -> Result<Vec<UpdateItem>, RagError>;
}

/// Fetches the readable paragraphs of a linked article
#[async_trait]
pub trait ArticleFetcher: Send + Sync + Debug {
    /// Returns the page's paragraph texts in document order
    async fn paragraphs(&self, link: &str) -> Result<Vec<String>, RagError>;
}
