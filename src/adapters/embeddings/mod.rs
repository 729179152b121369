//! Embedding provider adapters.

pub mod error;
pub mod hashing;
pub mod openai;
pub mod retry;

use std::sync::Arc;

use tracing::info;

pub use error::EmbeddingApiError;
pub use hashing::HashingEmbeddingProvider;
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
pub use retry::RetryPolicy;

use crate::domain::errors::RagResult;
use crate::domain::models::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::ports::EmbeddingProvider;

/// Build the provider selected by `config.provider`.
pub fn build_provider(config: &EmbeddingConfig) -> RagResult<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderKind::Hashing => Arc::new(HashingEmbeddingProvider::new(config.dimension)?),
        EmbeddingProviderKind::Openai => {
            Arc::new(OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig::from(config))?)
        }
    };

    info!(
        provider = provider.name(),
        dimension = provider.dimension(),
        "embedding provider ready"
    );
    Ok(provider)
}
