//! Configuration-time backend selection.

use std::sync::Arc;

use tracing::info;

use super::{FileVectorStore, PgVectorStore};
use crate::domain::errors::RagResult;
use crate::domain::models::{StoreBackend, StoreConfig};
use crate::domain::ports::VectorStore;

/// Open the store selected by `config.backend`.
///
/// The file backend loads its snapshot if present; the Postgres backend
/// connects and prepares its schema.
pub async fn open_vector_store(config: &StoreConfig) -> RagResult<Arc<dyn VectorStore>> {
    info!(backend = config.backend.as_str(), "opening vector store");

    let store: Arc<dyn VectorStore> = match config.backend {
        StoreBackend::File => Arc::new(FileVectorStore::open(&config.file.snapshot_path).await?),
        StoreBackend::Postgres => Arc::new(PgVectorStore::connect(&config.postgres).await?),
    };
    Ok(store)
}
