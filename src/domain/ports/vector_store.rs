//! Vector store port.
//!
//! A store owns every record of one collection. Implementations decide where
//! records live and how similarity search is executed; callers only rely on
//! the ranking contract below.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::{MetadataFilter, NewRecord, ScoredRecord};

/// Storage and similarity search over embedded chunks.
///
/// Ranking contract for [`search`](VectorStore::search):
/// - at most `top_k` results, ordered by descending cosine similarity
/// - ties broken by insertion order, earlier first
/// - `top_k == 0` is `InvalidInput`
/// - an empty store yields an empty result
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name (e.g., "file", "postgres").
    fn name(&self) -> &'static str;

    /// Append a batch of records and return their fresh ids in input order.
    ///
    /// Every embedding must have the store's dimension; otherwise nothing is
    /// written.
    async fn add(&self, records: Vec<NewRecord>) -> RagResult<Vec<String>>;

    /// Return the `top_k` records most similar to `query`, optionally
    /// restricted to records whose metadata matches `filter`.
    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> RagResult<Vec<ScoredRecord>>;

    /// Remove records by id and return how many existed.
    async fn delete(&self, ids: &[String]) -> RagResult<usize>;

    /// Number of stored records.
    async fn count(&self) -> RagResult<usize>;
}
