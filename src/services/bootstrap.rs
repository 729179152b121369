//! Warm start for the file-backed store.

use tracing::info;

use super::ingestion::{IngestionPipeline, IngestionReport};
use crate::domain::errors::RagResult;
use crate::domain::models::{ChunkConfig, Document};
use crate::infrastructure::vector::FileVectorStore;

/// What [`warm_start`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarmStart {
    /// An existing snapshot was loaded
    Loaded { records: usize },
    /// No snapshot existed; seed documents were ingested and saved
    Seeded(IngestionReport),
}

/// Load the snapshot behind `store`, or ingest `seed` and save when there is
/// none.
///
/// `pipeline` must write into `store`.
pub async fn warm_start(
    store: &FileVectorStore,
    pipeline: &IngestionPipeline,
    seed: &[Document],
    config: &ChunkConfig,
) -> RagResult<WarmStart> {
    if store.load().await? {
        let records = store.records().await.len();
        info!(path = %store.path().display(), records, "using existing snapshot");
        return Ok(WarmStart::Loaded { records });
    }

    let report = pipeline.ingest(seed, config).await?;
    store.save().await?;

    info!(
        path = %store.path().display(),
        chunks = report.chunk_count,
        "seeded new snapshot"
    );
    Ok(WarmStart::Seeded(report))
}
