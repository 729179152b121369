//! Query-time retrieval and context rendering.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use super::embedding_service::EmbeddingService;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{MetadataFilter, RetrievalConfig, ScoredRecord};
use crate::domain::ports::VectorStore;

const CONTEXT_DELIMITER: &str = "---------------------";

/// Ranked records for one query and the context block built from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AugmentedContext {
    /// Records in rank order
    pub retrieved: Vec<ScoredRecord>,
    /// Record contents joined with the configured separator
    pub rendered_context: String,
}

impl AugmentedContext {
    pub fn is_empty(&self) -> bool {
        self.retrieved.is_empty()
    }

    /// Build the user message for a downstream model: the question followed
    /// by the context between delimiter lines and an instruction to answer
    /// from that context only. Without context the question is returned
    /// unchanged.
    pub fn prompt_for(&self, question: &str) -> String {
        if self.is_empty() {
            return question.to_string();
        }

        format!(
            "{question}\n\n\
             Context information is below, surrounded by {CONTEXT_DELIMITER}\n\n\
             {CONTEXT_DELIMITER}\n\
             {context}\n\
             {CONTEXT_DELIMITER}\n\n\
             Given the context and provided history information and not prior knowledge, \
             reply to the user comment. If the answer is not in the context, inform \
             the user that you can't answer the question.",
            context = self.rendered_context,
        )
    }
}

/// Embeds a query, searches the store and renders the hits as context.
pub struct RetrievalAugmenter {
    embeddings: EmbeddingService,
    store: Arc<dyn VectorStore>,
    config: RetrievalConfig,
}

impl RetrievalAugmenter {
    pub fn new(
        embeddings: EmbeddingService,
        store: Arc<dyn VectorStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embeddings,
            store,
            config,
        }
    }

    pub const fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Retrieve the `top_k` most relevant records for `query`.
    pub async fn augment(&self, query: &str, top_k: usize) -> RagResult<AugmentedContext> {
        self.augment_filtered(query, top_k, None).await
    }

    /// Like [`augment`](Self::augment), restricted to records matching
    /// `filter`.
    #[instrument(skip(self, query, filter), fields(store = self.store.name()))]
    pub async fn augment_filtered(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> RagResult<AugmentedContext> {
        if top_k == 0 {
            return Err(RagError::InvalidInput("top_k must be greater than 0".to_string()));
        }

        let vector = self.embeddings.embed_query(query).await?;
        let mut retrieved = self.store.search(&vector, top_k, filter).await?;

        if let Some(threshold) = self.config.similarity_threshold {
            retrieved.retain(|hit| hit.score >= threshold);
        }

        let rendered_context = retrieved
            .iter()
            .map(|hit| hit.record.content.as_str())
            .collect::<Vec<_>>()
            .join(&self.config.context_separator);

        debug!(hits = retrieved.len(), "retrieved context");
        Ok(AugmentedContext {
            retrieved,
            rendered_context,
        })
    }
}
