pub mod chunking;
pub mod config;
pub mod document;
pub mod filter;
pub mod metadata;
pub mod record;

pub use chunking::{Chunk, ChunkConfig};
pub use config::{
    Config, EmbeddingConfig, EmbeddingProviderKind, FileStoreConfig, LogFormat, LoggingConfig,
    PostgresStoreConfig, RetrievalConfig, RotationPolicy, StoreBackend, StoreConfig,
};
pub use document::Document;
pub use filter::MetadataFilter;
pub use metadata::Metadata;
pub use record::{cosine_similarity, NewRecord, ScoredRecord, VectorRecord};
