//! Document ingestion: chunk, embed, store.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use super::embedding_service::EmbeddingService;
use crate::domain::errors::RagResult;
use crate::domain::models::{ChunkConfig, Document, NewRecord};
use crate::domain::ports::VectorStore;
use crate::infrastructure::chunking::Chunker;

/// Outcome of one [`IngestionPipeline::ingest`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub document_count: usize,
    pub chunk_count: usize,
    /// `ids[i]` is the stored id of the i-th chunk in emission order
    pub ids: Vec<String>,
}

/// Splits documents, embeds every chunk and writes them to a store in one
/// batch.
pub struct IngestionPipeline {
    embeddings: EmbeddingService,
    store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    pub fn new(embeddings: EmbeddingService, store: Arc<dyn VectorStore>) -> Self {
        Self { embeddings, store }
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Ingest `documents`.
    ///
    /// All chunks are embedded before anything is written, so an embedding
    /// failure leaves the store unchanged. Nothing is retried here.
    #[instrument(skip_all, fields(documents = documents.len(), store = self.store.name()))]
    pub async fn ingest(
        &self,
        documents: &[Document],
        config: &ChunkConfig,
    ) -> RagResult<IngestionReport> {
        config.validate()?;

        let mut chunks = Vec::new();
        for document in documents {
            chunks.extend(Chunker::split(document, config)?);
        }

        if chunks.is_empty() {
            info!("no chunks to ingest");
            return Ok(IngestionReport {
                document_count: documents.len(),
                ..IngestionReport::default()
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embeddings.embed_texts(&texts).await?;

        let records: Vec<NewRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| NewRecord::new(chunk.text, embedding, chunk.metadata))
            .collect();
        let chunk_count = records.len();

        let ids = self.store.add(records).await?;

        info!(chunks = chunk_count, "ingested documents");
        Ok(IngestionReport {
            document_count: documents.len(),
            chunk_count,
            ids,
        })
    }
}
