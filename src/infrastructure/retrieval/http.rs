//! Retriever backed by an external vector-search service

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{RagError, Retriever};
use crate::infrastructure::llm::HttpClientTrait;

/// Posts `{ "query", "k" }` to a search endpoint and expects `{ "documents": [...] }` back
#[derive(Debug)]
pub struct HttpRetriever<C: HttpClientTrait> {
    client: C,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    documents: Vec<String>,
}

impl<C: HttpClientTrait> HttpRetriever<C> {
    pub fn new(client: C, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> Retriever for HttpRetriever<C> {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, RagError> {
        let body = serde_json::json!({ "query": query, "k": k });

        let mut headers = vec![("Content-Type", "application/json")];
        let authorization = self.api_key.as_ref().map(|key| format!("Bearer {}", key));
        if let Some(value) = authorization.as_deref() {
            headers.push(("Authorization", value));
        }

        let json = self
            .client
            .post_json(&self.endpoint, headers, &body)
            .await
            .map_err(|e| RagError::retrieval(format!("search endpoint: {}", e)))?;

        let response: SearchResponse = serde_json::from_value(json)
            .map_err(|e| RagError::retrieval(format!("Invalid search response: {}", e)))?;

        let mut documents = response.documents;
        documents.truncate(k);

        tracing::debug!(documents = documents.len(), k, "Retrieved documents");
        Ok(documents)
    }

    fn retriever_name(&self) -> &'static str {
        "http"
    }
}
