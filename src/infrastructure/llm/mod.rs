//! Generation providers and the shared HTTP client seam

mod gemini;
pub mod http_client;

pub use gemini::{GeminiGenerator, DEFAULT_GEMINI_MODEL};
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
