//! Stored vector records and search results.

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// Write input for [`VectorStore::add`](crate::domain::ports::VectorStore::add).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewRecord {
    pub fn new(content: impl Into<String>, embedding: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            embedding,
            metadata,
        }
    }

    /// Attach a freshly generated UUID v4 id.
    pub fn into_record(self) -> VectorRecord {
        VectorRecord {
            id: uuid::Uuid::new_v4().to_string(),
            content: self.content,
            embedding: self.embedding,
            metadata: self.metadata,
        }
    }
}

/// One stored chunk: its text, embedding and metadata.
///
/// This is also the element type of the file-backed snapshot, so field names
/// are part of the on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorRecord {
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// A record paired with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: VectorRecord,
    pub score: f32,
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude. Sums are kept in `f64`
/// so any finite `f32` components produce a finite score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}
