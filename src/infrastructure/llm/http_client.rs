use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure, mapped by each caller onto its own failure kind
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError>;

    async fn get_text(&self, url: &str) -> Result<String, HttpError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HttpError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(HttpError::Status { status, body })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::Request(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    }

    async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::Request(e.to_string()))?;

        Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        responses: RwLock<HashMap<String, serde_json::Value>>,
        pages: RwLock<HashMap<String, String>>,
        errors: RwLock<HashMap<String, HttpError>>,
        requests: RwLock<Vec<(String, serde_json::Value)>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, response: serde_json::Value) -> Self {
            self.responses.write().unwrap().insert(url.into(), response);
            self
        }

        pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.pages.write().unwrap().insert(url.into(), body.into());
            self
        }

        pub fn with_error(self, url: impl Into<String>, error: HttpError) -> Self {
            self.errors.write().unwrap().insert(url.into(), error);
            self
        }

        /// Bodies posted so far, with their URLs
        pub fn requests(&self) -> Vec<(String, serde_json::Value)> {
            self.requests.read().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn post_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &serde_json::Value,
        ) -> Result<serde_json::Value, HttpError> {
            self.requests
                .write()
                .unwrap()
                .push((url.to_string(), body.clone()));

            if let Some(error) = self.errors.read().unwrap().get(url) {
                return Err(error.clone());
            }

            self.responses
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| HttpError::Request(format!("No mock response for {}", url)))
        }

        async fn get_text(&self, url: &str) -> Result<String, HttpError> {
            if let Some(error) = self.errors.read().unwrap().get(url) {
                return Err(error.clone());
            }

            self.pages
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| HttpError::Status {
                    status: 404,
                    body: format!("No mock page for {}", url),
                })
        }
    }
}
