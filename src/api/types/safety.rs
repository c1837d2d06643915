//! Request and response bodies for the safety endpoints

use serde::{Deserialize, Serialize};

use crate::domain::AnalyzedUpdate;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatesParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateView {
    pub title: String,
    pub link: String,
    pub published: String,
    pub danger_analysis: String,
}

impl From<AnalyzedUpdate> for UpdateView {
    fn from(update: AnalyzedUpdate) -> Self {
        let danger_analysis = update.analysis_text();
        Self {
            title: update.item.title,
            link: update.item.link,
            published: update.item.published,
            danger_analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatesResponse {
    pub updates: Vec<UpdateView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}
