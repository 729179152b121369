//! Shared setup for CLI commands: configuration, embedder and store.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::embeddings::build_provider;
use crate::domain::models::Config;
use crate::domain::ports::VectorStore;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::vector::{open_vector_store, FileVectorStore};
use crate::services::EmbeddingService;

/// Everything a command needs, built from the effective configuration
pub struct AppContext {
    pub config: Config,
    pub embeddings: EmbeddingService,
}

impl AppContext {
    /// Load configuration from `config_path`, or from `.ragline/` when none
    /// is given, and build the embedding provider.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::from_config(Self::load_config(config_path)?)
    }

    /// Effective configuration from `config_path`, or from `.ragline/` when
    /// none is given.
    pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let provider =
            build_provider(&config.embedding).context("Failed to build embedding provider")?;
        Ok(Self {
            config,
            embeddings: EmbeddingService::new(provider),
        })
    }

    /// Open the configured store
    pub async fn open_store(&self) -> Result<Arc<dyn VectorStore>> {
        open_vector_store(&self.config.store)
            .await
            .context("Failed to open vector store")
    }

    /// Open the file-backed store directly, for commands that save snapshots
    pub async fn open_file_store(&self) -> Result<Arc<FileVectorStore>> {
        let path = &self.config.store.file.snapshot_path;
        let store = FileVectorStore::open(path)
            .await
            .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
        Ok(Arc::new(store))
    }
}
