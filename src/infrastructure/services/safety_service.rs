//! Mine safety operations exposed at the service boundary

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt};

use super::fan_out::{FanOutCoordinator, WorkItem};
use super::orchestrator::{CacheOrchestrator, Resolution};
use crate::domain::updates::{ARTICLE_PARAGRAPH_LIMIT, NO_ARTICLE_TEXT, UNREACHABLE_ARTICLE_TEXT};
use crate::domain::{
    AnalyzedUpdate, ArticleFetcher, AuditReportRequest, RagError, ReportComposer, ReportDocument,
    UpdateFeed, UpdateItem,
};

/// Number of updates analyzed when the caller gives no limit
pub const DEFAULT_UPDATE_LIMIT: usize = 5;

/// A rendered report ready for download
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: &'static str,
}

/// Answers questions, analyzes published updates and builds audit reports
#[derive(Debug, Clone)]
pub struct SafetyService {
    orchestrator: CacheOrchestrator,
    fan_out: FanOutCoordinator,
    feed: Arc<dyn UpdateFeed>,
    articles: Arc<dyn ArticleFetcher>,
    composer: Arc<dyn ReportComposer>,
    default_update_limit: usize,
}

impl SafetyService {
    pub fn new(
        orchestrator: CacheOrchestrator,
        feed: Arc<dyn UpdateFeed>,
        articles: Arc<dyn ArticleFetcher>,
        composer: Arc<dyn ReportComposer>,
    ) -> Self {
        Self {
            fan_out: FanOutCoordinator::new(orchestrator.clone()),
            orchestrator,
            feed,
            articles,
            composer,
            default_update_limit: DEFAULT_UPDATE_LIMIT,
        }
    }

    pub fn with_default_update_limit(mut self, limit: usize) -> Self {
        self.default_update_limit = limit;
        self
    }

    /// Bounds both article downloads and analysis resolution
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.fan_out = FanOutCoordinator::new(self.orchestrator.clone()).with_max_concurrency(limit);
        self
    }

    pub fn orchestrator(&self) -> &CacheOrchestrator {
        &self.orchestrator
    }

    /// Answers a free-form question through the tiered cache
    pub async fn answer_query(&self, query: &str) -> Result<String, RagError> {
        let resolution = self.orchestrator.resolve(query).await?;
        log_storage_warning(&resolution);
        Ok(resolution.value)
    }

    /// Fetches the newest updates and classifies each one
    ///
    /// Only a failing feed fails the call. Article and analysis failures are
    /// kept per item.
    pub async fn analyze_updates(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<AnalyzedUpdate>, RagError> {
        let limit = limit.unwrap_or(self.default_update_limit);
        let items = self.feed.fetch(limit).await?;
        tracing::info!(items = items.len(), "Analyzing safety updates");

        let concurrency = self.fan_out.max_concurrency().unwrap_or(items.len()).max(1);
        let work: Vec<WorkItem<UpdateItem>> = stream::iter(items)
            .map(|item| async move {
                let content = self.article_content(&item.link).await;
                let prompt = item.analysis_prompt(&content);
                WorkItem::new(item, prompt)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let analyzed = self
            .fan_out
            .resolve_all(work)
            .await
            .into_iter()
            .map(|outcome| AnalyzedUpdate {
                item: outcome.identity,
                analysis: outcome.result.map(|resolution| {
                    log_storage_warning(&resolution);
                    resolution.value
                }),
            })
            .collect();

        Ok(analyzed)
    }

    /// Generates an audit report and renders it as a document
    ///
    /// A failed generation is rendered into the document body rather than
    /// returned, so the caller always receives a file.
    pub async fn build_audit_report(
        &self,
        request: &AuditReportRequest,
    ) -> Result<RenderedReport, RagError> {
        let body = match self.orchestrator.resolve(&request.prompt()).await {
            Ok(resolution) => {
                log_storage_warning(&resolution);
                resolution.value
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Audit report generation failed");
                format!("Error generating report: {}", e)
            }
        };

        let document = ReportDocument::audit(request, body);
        let bytes = self.composer.compose(&document)?;

        Ok(RenderedReport {
            bytes,
            file_name: request.file_name(self.composer.file_extension()),
            content_type: self.composer.content_type(),
        })
    }

    async fn article_content(&self, link: &str) -> String {
        match self.articles.paragraphs(link).await {
            Ok(paragraphs) if paragraphs.is_empty() => NO_ARTICLE_TEXT.to_string(),
            Ok(paragraphs) => paragraphs
                .iter()
                .take(ARTICLE_PARAGRAPH_LIMIT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => {
                tracing::debug!(link, error = %e, "Article unavailable");
                UNREACHABLE_ARTICLE_TEXT.to_string()
            }
        }
    }
}

fn log_storage_warning(resolution: &Resolution) {
    if let Some(warning) = &resolution.storage_warning {
        tracing::warn!(error = %warning, "Answer served without being persisted");
    }
}
