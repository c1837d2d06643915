//! HTTP request, response and error types

pub mod error;
pub mod json;
pub mod safety;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use safety::{
    BannerResponse, QueryRequest, QueryResponse, UpdateView, UpdatesParams, UpdatesResponse,
};
