//! Retrieval-augmented generation pipeline

use std::sync::Arc;

use crate::domain::{Generator, RagError, Retriever};

/// Retrieval depth used when none is configured
pub const DEFAULT_TOP_K: usize = 5;

/// How the answer was grounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grounding {
    /// Generation saw this many retrieved documents
    Documents(usize),
    /// Retrieval returned nothing; generation ran with an empty context
    EmptyContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub answer: String,
    pub grounding: Grounding,
}

/// Composes retrieval and generation into one answer
#[derive(Debug, Clone)]
pub struct RagPipeline {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(retriever: Arc<dyn Retriever>, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieves context for `query` and generates an answer from it
    ///
    /// An empty retrieval result is not an error: generation still runs and
    /// the result reports [`Grounding::EmptyContext`].
    pub async fn run(&self, query: &str) -> Result<PipelineResult, RagError> {
        let documents = self.retriever.search(query, self.top_k).await?;

        let grounding = if documents.is_empty() {
            tracing::warn!(
                retriever = self.retriever.retriever_name(),
                "No documents retrieved, generating with empty context"
            );
            Grounding::EmptyContext
        } else {
            Grounding::Documents(documents.len())
        };

        let prompt = build_prompt(query, &documents);
        let answer = self.generator.generate(&prompt).await?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(RagError::generation(format!(
                "{} returned an empty answer",
                self.generator.generator_name()
            )));
        }

        tracing::debug!(?grounding, answer_len = answer.len(), "Pipeline completed");

        Ok(PipelineResult {
            answer: answer.to_string(),
            grounding,
        })
    }
}

/// The generation prompt for a question and its retrieved documents
pub fn build_prompt(query: &str, documents: &[String]) -> String {
    format!(
        "You are an expert mining assistant.\n\n\
         User question:\n{}\n\n\
         Relevant mining documents:\n{}\n\n\
         Answer concisely, factually, and directly.",
        query,
        documents.join("\n\n")
    )
}
