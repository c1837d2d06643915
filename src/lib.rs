//! Digital Mine Safety Officer
//!
//! Answers mining-safety questions with retrieval-augmented generation served
//! through a two-tier cache:
//! - L1: bounded in-process map, FIFO eviction by default
//! - L2: durable store (SQLite by default, PostgreSQL optional)
//! - Single-flight pipeline execution per question
//! - Concurrent analysis of published safety updates
//! - PDF audit reports

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use crate::config::RetrievalBackend;
use domain::{Generator, Retriever};
use infrastructure::{
    cache::{L1Cache, StoreFactory},
    llm::{GeminiGenerator, HttpClient},
    report::PdfReportComposer,
    retrieval::{HttpRetriever, KeywordRetriever},
    services::{CacheOrchestrator, RagPipeline, SafetyService},
    updates::{HtmlArticleFetcher, RssUpdateFeed},
};
use tracing::info;

/// Builds the cache tiers, collaborators and service from configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let l1 = L1Cache::new(config.cache.l1_capacity, config.cache.eviction)?;
    let store = StoreFactory::new()
        .create(&config.cache.store_config())
        .await?;
    info!(
        store = store.store_type(),
        l1_capacity = config.cache.l1_capacity,
        eviction = ?config.cache.eviction,
        "Cache tiers ready"
    );

    let retriever = create_retriever(config).await?;
    let generator = create_generator(config)?;
    let pipeline = RagPipeline::new(retriever, generator).with_top_k(config.retrieval.top_k);

    let orchestrator = CacheOrchestrator::new(l1, store, pipeline);

    let updates = &config.updates;
    let page_timeout = Duration::from_secs(updates.article_timeout_secs);
    let feed = RssUpdateFeed::new(HttpClient::with_timeout(page_timeout)?, &updates.feed_url);
    let articles = HtmlArticleFetcher::new(HttpClient::with_timeout(page_timeout)?);

    let service = SafetyService::new(
        orchestrator,
        Arc::new(feed),
        Arc::new(articles),
        Arc::new(PdfReportComposer::new()),
    )
    .with_default_update_limit(updates.default_limit)
    .with_max_concurrency(updates.max_concurrency);

    Ok(AppState::new(service))
}

async fn create_retriever(config: &AppConfig) -> anyhow::Result<Arc<dyn Retriever>> {
    let retrieval = &config.retrieval;

    match retrieval.backend {
        RetrievalBackend::Http => {
            let endpoint = retrieval
                .endpoint
                .as_deref()
                .filter(|e| !e.is_empty())
                .ok_or_else(|| anyhow::anyhow!("retrieval.endpoint is required for the http backend"))?;

            let client = HttpClient::with_timeout(Duration::from_secs(retrieval.timeout_secs))?;
            let mut retriever = HttpRetriever::new(client, endpoint);
            if let Some(key) = &retrieval.api_key {
                retriever = retriever.with_api_key(key);
            }

            info!(endpoint, "Using HTTP retriever");
            Ok(Arc::new(retriever))
        }
        RetrievalBackend::Keyword => {
            let retriever = KeywordRetriever::load(&retrieval.corpus_path).await?;
            Ok(Arc::new(retriever))
        }
    }
}

fn create_generator(config: &AppConfig) -> anyhow::Result<Arc<dyn Generator>> {
    let generation = &config.generation;

    let api_key = generation.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "generation.api_key is not configured and {} is not set",
            crate::config::API_KEY_ENV
        )
    })?;

    let client = HttpClient::with_timeout(Duration::from_secs(generation.timeout_secs))?;
    let generator = GeminiGenerator::with_base_url(client, api_key, &generation.base_url)
        .with_model(&generation.model);

    info!(model = %generation.model, "Using Gemini generator");
    Ok(Arc::new(generator))
}
