//! Domain errors for the ragline pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`RagError`], used by callers to decide whether
/// a failed ingestion or query is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid chunking or store configuration.
    Configuration,
    /// Caller passed an argument the operation cannot accept.
    InvalidInput,
    /// The embedding model failed or returned a malformed vector.
    Embedding,
    /// Persisted data exists but cannot be read back.
    Corruption,
    /// The backing store could not be reached.
    Unavailable,
}

/// Errors raised by chunking, embedding, storage and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailure(String),

    /// The embedding service stayed rate limited or unreachable after retries.
    #[error("Embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// `path` is the snapshot file, or the table for the Postgres store.
    #[error("Corrupt data in {}: {reason}", path.display())]
    StorageCorruption { path: PathBuf, reason: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl RagError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::EmbeddingFailure(_) | Self::EmbeddingUnavailable(_) => ErrorKind::Embedding,
            Self::StorageCorruption { .. } => ErrorKind::Corruption,
            Self::StorageUnavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Transient infrastructure failures may succeed on a later attempt.
    /// A rejected request or malformed vector never will.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingUnavailable(_) | Self::StorageUnavailable(_)
        )
    }

    pub(crate) fn corruption(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StorageCorruption {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type RagResult<T> = Result<T, RagError>;

impl From<sqlx::Error> for RagError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
