//! Adapters to external systems: embedding model endpoints and document
//! sources.

pub mod embeddings;
pub mod text_reader;

pub use text_reader::TextFileReader;
