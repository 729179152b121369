//! Common test utilities for integration tests
//!
//! Shared fixtures for the ingestion, retrieval and store suites.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use ragline::adapters::embeddings::HashingEmbeddingProvider;
use ragline::{Document, EmbeddingService, FileVectorStore, Metadata};
use tempfile::TempDir;

/// Dimension used by the hashing embedder in tests
pub const TEST_DIMENSION: usize = 256;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Snapshot path inside a fresh temporary directory
pub fn temp_snapshot_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("vectorstore.json");
    (dir, path)
}

/// Embedding service backed by the deterministic hashing embedder
pub fn hashing_embeddings() -> EmbeddingService {
    EmbeddingService::new(Arc::new(
        HashingEmbeddingProvider::new(TEST_DIMENSION).expect("valid dimension"),
    ))
}

/// Empty file store that is not yet persisted
pub fn file_store(path: &std::path::Path) -> Arc<FileVectorStore> {
    Arc::new(FileVectorStore::new(path))
}

/// Document with a `filename` entry
pub fn document(filename: &str, text: &str) -> Document {
    Document::new(text).with_metadata(Metadata::new().with("filename", filename))
}

/// A few short documents on unrelated topics
pub fn sample_corpus() -> Vec<Document> {
    vec![
        document(
            "rust.md",
            "Rust guarantees memory safety through ownership and borrowing. \
             The borrow checker rejects dangling references at compile time.",
        ),
        document(
            "bread.md",
            "Sourdough bread rises with a starter of wild yeast. \
             Bakers feed the starter with flour and water every day.",
        ),
        document(
            "tides.md",
            "Ocean tides follow the gravitational pull of the moon. \
             Spring tides happen when the sun and moon align.",
        ),
    ]
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
