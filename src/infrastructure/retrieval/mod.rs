//! Retrieval backends

mod http;
mod keyword;

pub use http::HttpRetriever;
pub use keyword::{KeywordRetriever, CORPUS_VERSION};
