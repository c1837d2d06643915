use serde::{Deserialize, Serialize};

use crate::domain::RagError;

/// Number of leading article paragraphs folded into an analysis prompt
pub const ARTICLE_PARAGRAPH_LIMIT: usize = 5;

/// Article content used when the page has no paragraphs
pub const NO_ARTICLE_TEXT: &str = "(No text found.)";

/// Article content used when the page could not be fetched
pub const UNREACHABLE_ARTICLE_TEXT: &str = "(Could not fetch full article text.)";

/// One published safety update (e.g. a DGMS circular)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub title: String,
    pub link: String,
    pub published: String,
}

impl UpdateItem {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published: published.into(),
        }
    }

    /// Builds the risk-classification prompt for this update
    ///
    /// The prompt is used verbatim as the cache key, so identical updates
    /// with identical article text share one cached analysis.
    pub fn analysis_prompt(&self, content: &str) -> String {
        format!(
            "You are a mining safety officer. Analyze the following DGMS update \
             and classify the risk level (High, Medium, Low, or None), and describe \
             the hazard type.\n\n\
             Title: {}\nPublished: {}\nLink: {}\n\
             Content: {}",
            self.title, self.published, self.link, content
        )
    }
}

/// An update together with its analysis outcome
#[derive(Debug, Clone)]
pub struct AnalyzedUpdate {
    pub item: UpdateItem,
    pub analysis: Result<String, RagError>,
}

impl AnalyzedUpdate {
    /// Analysis text, or the failure rendered for display
    pub fn analysis_text(&self) -> String {
        match &self.analysis {
            Ok(text) => text.clone(),
            Err(e) => format!("Error: {}", e),
        }
    }
}
