//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - EmbeddingProvider: text to dense vector
//! - VectorStore: storage and similarity search of embedded chunks
//!
//! These traits define the contracts that allow the services to be independent
//! of specific infrastructure implementations.

pub mod embedding;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use vector_store::VectorStore;
