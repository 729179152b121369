pub mod bootstrap;
pub mod embedding_service;
pub mod ingestion;
pub mod retrieval;

pub use bootstrap::{warm_start, WarmStart};
pub use embedding_service::EmbeddingService;
pub use ingestion::{IngestionPipeline, IngestionReport};
pub use retrieval::{AugmentedContext, RetrievalAugmenter};
