//! Retrieval domain - "given text, return top-k similar documents"

mod provider;

pub use provider::Retriever;

#[cfg(test)]
pub use provider::mock::MockRetriever;
