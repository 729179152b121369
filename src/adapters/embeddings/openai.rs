//! HTTP embedder for `/embeddings` endpoints.
//!
//! Speaks the OpenAI wire format, which most hosted and self-hosted
//! embedding servers accept.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingApiError;
use super::retry::RetryPolicy;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::EmbeddingProvider;

const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Endpoint settings for [`OpenAiEmbeddingProvider`]
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// Bearer token; `OPENAI_API_KEY` is read when unset
    pub api_key: Option<String>,
    /// Endpoint root, `/embeddings` is appended
    pub base_url: String,
    pub model: String,
    /// Length every returned vector must have
    pub dimension: usize,
    pub timeout_secs: u64,
    /// Upper bound on inputs per request
    pub max_batch_size: usize,
    /// Backoff for 429, 5xx and network failures.
    pub retry: RetryPolicy,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_secs: 30,
            max_batch_size: 2048,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&EmbeddingConfig> for OpenAiEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            max_batch_size: config.max_batch_size,
            retry: RetryPolicy::new(config.retries, 500, 8_000),
        }
    }
}

impl OpenAiEmbeddingConfig {
    fn resolve_api_key(&self) -> Result<String, EmbeddingApiError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or(EmbeddingApiError::MissingApiKey),
        }
    }
}

/// Embedding provider backed by an OpenAI-compatible HTTP endpoint.
///
/// Every request batch goes through the configured [`RetryPolicy`].
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig) -> RagResult<Self> {
        if config.max_batch_size == 0 {
            return Err(RagError::Configuration(
                "embedding max_batch_size must be greater than 0".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingApiError> {
        let token = self.config.resolve_api_key()?;
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(EmbeddingApiError::from_status(status, detail));
        }

        let EmbeddingsResponse { mut data } = response
            .json()
            .await
            .map_err(|e| EmbeddingApiError::InvalidResponse(e.to_string()))?;

        if data.len() != texts.len() {
            return Err(EmbeddingApiError::InvalidResponse(format!(
                "sent {} inputs, received {} embeddings",
                texts.len(),
                data.len()
            )));
        }

        // the server may answer out of order
        data.sort_unstable_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| RagError::EmbeddingFailure("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.config.max_batch_size) {
            let vectors = self
                .config
                .retry
                .execute(|| self.request_embeddings(batch))
                .await?;
            all_vectors.extend(vectors);
        }

        debug!(
            model = %self.config.model,
            texts = texts.len(),
            "embedded batch"
        );
        Ok(all_vectors)
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
