use thiserror::Error;

/// Core domain errors
///
/// Cloneable so a single pipeline failure can be handed to every caller
/// waiting on the same in-flight execution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RagError {
    #[error("Retrieval unavailable: {message}")]
    RetrievalUnavailable { message: String },

    #[error("Generation unavailable: {message}")]
    GenerationUnavailable { message: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RagError {
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::RetrievalUnavailable {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationUnavailable {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RetrievalUnavailable { .. } => "retrieval_unavailable",
            Self::GenerationUnavailable { .. } => "generation_unavailable",
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::Validation { .. } => "validation",
            Self::Configuration { .. } => "configuration",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}
