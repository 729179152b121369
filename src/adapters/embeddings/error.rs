use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::RagError;

/// Failures talking to an HTTP embedding endpoint
#[derive(Error, Debug)]
pub enum EmbeddingApiError {
    #[error("API key not set. Set OPENAI_API_KEY or configure embedding.api_key")]
    MissingApiKey,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Server error ({0}): {1}")]
    Server(StatusCode, String),

    #[error("Request rejected ({0}): {1}")]
    Client(StatusCode, String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    InvalidResponse(String),
}

impl EmbeddingApiError {
    /// Map a non-success HTTP status
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            429 => Self::RateLimited,
            500..=599 => Self::Server(status, body),
            _ => Self::Client(status, body),
        }
    }

    /// Rate limits, server errors and network failures may clear up
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Server(..) | Self::Network(_))
    }
}

impl From<reqwest::Error> for EmbeddingApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<EmbeddingApiError> for RagError {
    fn from(err: EmbeddingApiError) -> Self {
        match err {
            EmbeddingApiError::MissingApiKey => Self::Configuration(err.to_string()),
            _ if err.is_transient() => Self::EmbeddingUnavailable(err.to_string()),
            _ => Self::EmbeddingFailure(err.to_string()),
        }
    }
}
