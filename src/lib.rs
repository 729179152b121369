//! ragline - retrieval-augmented generation pipeline
//!
//! Documents are split into overlapping token windows, embedded by an
//! external model and stored with their text and metadata. At query time the
//! closest chunks are retrieved and rendered into a context block for a
//! downstream language model.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): ingestion and retrieval orchestration
//! - **Infrastructure Layer** (`infrastructure`): chunker, vector stores, config, logging
//! - **Adapters** (`adapters`): embedding endpoints and file readers
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ragline::adapters::embeddings::HashingEmbeddingProvider;
//! use ragline::infrastructure::vector::FileVectorStore;
//! use ragline::{ChunkConfig, Document, EmbeddingService, IngestionPipeline};
//! use ragline::{RetrievalAugmenter, RetrievalConfig};
//!
//! # async fn example() -> ragline::RagResult<()> {
//! let embeddings = EmbeddingService::new(Arc::new(HashingEmbeddingProvider::new(384)?));
//! let store = Arc::new(FileVectorStore::open(".ragline/vectorstore.json").await?);
//!
//! let pipeline = IngestionPipeline::new(embeddings.clone(), store.clone());
//! pipeline
//!     .ingest(&[Document::new("Chunks are embedded and stored.")], &ChunkConfig::default())
//!     .await?;
//! store.save().await?;
//!
//! let augmenter = RetrievalAugmenter::new(embeddings, store, RetrievalConfig::default());
//! let context = augmenter.augment("How are chunks stored?", 4).await?;
//! println!("{}", context.prompt_for("How are chunks stored?"));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ErrorKind, RagError, RagResult};
pub use domain::models::{
    Chunk, ChunkConfig, Config, Document, Metadata, MetadataFilter, NewRecord, RetrievalConfig,
    ScoredRecord, VectorRecord,
};
pub use domain::ports::{EmbeddingProvider, VectorStore};
pub use infrastructure::chunking::Chunker;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{open_vector_store, FileVectorStore, PgVectorStore};
pub use services::{
    AugmentedContext, EmbeddingService, IngestionPipeline, IngestionReport, RetrievalAugmenter,
};
