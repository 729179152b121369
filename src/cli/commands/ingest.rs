use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::TextFileReader;
use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{ChunkConfig, Document, StoreBackend};
use crate::domain::ports::VectorStore;
use crate::services::{IngestionPipeline, IngestionReport};

#[derive(Debug, Serialize)]
pub struct IngestOutput {
    pub backend: String,
    pub files: Vec<String>,
    pub document_count: usize,
    pub chunk_count: usize,
    pub ids: Vec<String>,
    /// Snapshot written by the file backend
    pub snapshot: Option<String>,
}

impl CommandOutput for IngestOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Ingested {} chunk{} from {} document{} into the {} store",
            self.chunk_count,
            if self.chunk_count == 1 { "" } else { "s" },
            self.document_count,
            if self.document_count == 1 { "" } else { "s" },
            self.backend
        )];
        if let Some(ref snapshot) = self.snapshot {
            lines.push(format!("Snapshot saved to {snapshot}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Handle `ragline ingest`
pub async fn execute(
    ctx: &AppContext,
    files: Vec<PathBuf>,
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut chunking = ctx.config.chunking.clone();
    if let Some(size) = chunk_size {
        chunking.chunk_size = size;
    }
    if let Some(overlap) = overlap {
        chunking.overlap = overlap;
    }

    let documents = TextFileReader::read_all(&files)
        .await
        .context("Failed to read input files")?;

    let (backend, report, snapshot) = match ctx.config.store.backend {
        StoreBackend::File => {
            let store = ctx.open_file_store().await?;
            let report = ingest(ctx, store.clone(), &documents, &chunking).await?;
            store.save().await.context("Failed to save snapshot")?;
            (store.name(), report, Some(store.path().display().to_string()))
        }
        StoreBackend::Postgres => {
            let store = ctx.open_store().await?;
            let report = ingest(ctx, store.clone(), &documents, &chunking).await?;
            (store.name(), report, None)
        }
    };

    let result = IngestOutput {
        backend: backend.to_string(),
        files: files.iter().map(|f| f.display().to_string()).collect(),
        document_count: report.document_count,
        chunk_count: report.chunk_count,
        ids: report.ids,
        snapshot,
    };
    output(&result, json);
    Ok(())
}

async fn ingest(
    ctx: &AppContext,
    store: Arc<dyn VectorStore>,
    documents: &[Document],
    chunking: &ChunkConfig,
) -> Result<IngestionReport> {
    IngestionPipeline::new(ctx.embeddings.clone(), store)
        .ingest(documents, chunking)
        .await
        .context("Ingestion failed")
}
