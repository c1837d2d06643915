//! Term-overlap retriever over a local JSON corpus, for development without a search service

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{RagError, Retriever};

/// The only corpus layout accepted by [`KeywordRetriever`]
pub const CORPUS_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct CorpusFile {
    version: u32,
    documents: Vec<String>,
}

#[derive(Debug)]
struct IndexedDoc {
    content: String,
    terms: HashSet<String>,
}

/// Ranks documents by how many distinct query terms they contain
#[derive(Debug)]
pub struct KeywordRetriever {
    documents: Vec<IndexedDoc>,
}

impl KeywordRetriever {
    pub fn new(documents: Vec<String>) -> Self {
        let documents = documents
            .into_iter()
            .map(|content| IndexedDoc {
                terms: terms(&content),
                content,
            })
            .collect();

        Self { documents }
    }

    /// Parses a `{ "version": 1, "documents": [...] }` corpus
    pub fn from_json(raw: &str) -> Result<Self, RagError> {
        let corpus: CorpusFile = serde_json::from_str(raw)
            .map_err(|e| RagError::configuration(format!("Invalid corpus file: {}", e)))?;

        if corpus.version != CORPUS_VERSION {
            return Err(RagError::configuration(format!(
                "Unsupported corpus version {} (expected {})",
                corpus.version, CORPUS_VERSION
            )));
        }

        Ok(Self::new(corpus.documents))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RagError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            RagError::configuration(format!("Failed to read corpus {}: {}", path.display(), e))
        })?;

        let retriever = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            documents = retriever.len(),
            "Loaded keyword corpus"
        );
        Ok(retriever)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl Retriever for KeywordRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, RagError> {
        let query_terms = terms(query);

        let mut scored: Vec<(usize, usize)> = self
            .documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| (idx, query_terms.intersection(&doc.terms).count()))
            .filter(|(_, score)| *score > 0)
            .collect();

        // stable: ties keep corpus order
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(idx, _)| self.documents[idx].content.clone())
            .collect())
    }

    fn retriever_name(&self) -> &'static str {
        "keyword"
    }
}
