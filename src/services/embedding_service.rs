//! Embedding service for query and bulk vector generation.
//!
//! Splits large inputs into provider-sized batches and checks every vector
//! the provider returns before it reaches a store.

use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::ports::EmbeddingProvider;

/// Embedding service that orchestrates embedding generation.
#[derive(Clone)]
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Provider name for diagnostics.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Embed a single query text.
    pub async fn embed_query(&self, text: &str) -> RagResult<Vec<f32>> {
        let vector = self.provider.embed(text).await?;
        self.check_vector(&vector, 0)?;
        Ok(vector)
    }

    /// Embed many texts, preserving order.
    ///
    /// Inputs are sent in batches of at most `max_batch_size`. Any provider
    /// error or malformed vector fails the whole call.
    pub async fn embed_texts(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let max_size = self.provider.max_batch_size().max(1);
        let mut all_vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(max_size) {
            let vectors = self.provider.embed_batch(batch).await?;
            if vectors.len() != batch.len() {
                return Err(RagError::EmbeddingFailure(format!(
                    "{} returned {} vectors for {} texts",
                    self.provider.name(),
                    vectors.len(),
                    batch.len()
                )));
            }
            for (offset, vector) in vectors.iter().enumerate() {
                self.check_vector(vector, all_vectors.len() + offset)?;
            }
            all_vectors.extend(vectors);
        }

        debug!(
            provider = self.provider.name(),
            texts = texts.len(),
            batches = texts.len().div_ceil(max_size),
            "embedded texts"
        );
        Ok(all_vectors)
    }

    fn check_vector(&self, vector: &[f32], position: usize) -> RagResult<()> {
        let expected = self.provider.dimension();
        if vector.len() != expected {
            return Err(RagError::EmbeddingFailure(format!(
                "vector {position} has dimension {}, expected {expected}",
                vector.len()
            )));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(RagError::EmbeddingFailure(format!(
                "vector {position} contains non-finite values"
            )));
        }
        Ok(())
    }
}
