//! File-backed vector store
//!
//! Keeps every record in memory and persists the collection as a JSON
//! snapshot on explicit [`FileVectorStore::save`].

use std::collections::HashSet;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    cosine_similarity, MetadataFilter, NewRecord, ScoredRecord, VectorRecord,
};
use crate::domain::ports::VectorStore;

/// In-memory vector store with a JSON snapshot file.
///
/// Search is an exact linear scan over every record, which suits collections
/// of hundreds to a few thousand chunks. Larger collections belong in
/// [`PgVectorStore`](super::PgVectorStore).
///
/// The snapshot is owned by a single process; concurrent writers to the same
/// file are not supported.
pub struct FileVectorStore {
    path: PathBuf,
    records: RwLock<Vec<VectorRecord>>,
}

impl FileVectorStore {
    /// Create an empty store bound to `path` without reading it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store bound to `path` and load the snapshot if one exists.
    pub async fn open(path: impl Into<PathBuf>) -> RagResult<Self> {
        let store = Self::new(path);
        store.load().await?;
        Ok(store)
    }

    /// Snapshot location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory records with the snapshot contents.
    ///
    /// Returns `Ok(false)` and leaves memory untouched when no snapshot file
    /// exists. A snapshot that cannot be parsed or holds inconsistent records
    /// is a `StorageCorruption` error, and memory is left untouched.
    pub async fn load(&self) -> RagResult<bool> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot to load");
                return Ok(false);
            }
            Err(err) => {
                return Err(RagError::StorageUnavailable(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        let loaded: Vec<VectorRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| RagError::corruption(&self.path, e))?;
        check_snapshot(&loaded).map_err(|reason| RagError::corruption(&self.path, reason))?;

        let count = loaded.len();
        *self.records.write().await = loaded;

        info!(path = %self.path.display(), records = count, "loaded vector snapshot");
        Ok(true)
    }

    /// Write every record to the snapshot path.
    ///
    /// The snapshot is written to a temporary file in the target directory
    /// and renamed over the old one, so an interrupted save never leaves a
    /// truncated snapshot behind.
    pub async fn save(&self) -> RagResult<()> {
        let (bytes, count) = {
            let records = self.records.read().await;
            let bytes = serde_json::to_vec(&*records).map_err(|e| {
                RagError::StorageUnavailable(format!("failed to serialize snapshot: {e}"))
            })?;
            (bytes, records.len())
        };

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| RagError::StorageUnavailable(format!("snapshot writer panicked: {e}")))??;

        info!(path = %self.path.display(), records = count, "saved vector snapshot");
        Ok(())
    }

    /// Copy of every record in insertion order
    pub async fn records(&self) -> Vec<VectorRecord> {
        self.records.read().await.clone()
    }
}

fn check_snapshot(records: &[VectorRecord]) -> Result<(), String> {
    let mut ids = HashSet::with_capacity(records.len());
    let dimension = records.first().map(VectorRecord::dimension);

    for record in records {
        if Some(record.dimension()) != dimension {
            return Err(format!(
                "record {} has dimension {}, expected {}",
                record.id,
                record.dimension(),
                dimension.unwrap_or_default()
            ));
        }
        if !ids.insert(record.id.as_str()) {
            return Err(format!("duplicate record id {}", record.id));
        }
    }

    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> RagResult<()> {
    let unavailable = |e: std::io::Error| {
        RagError::StorageUnavailable(format!("failed to write {}: {e}", path.display()))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(unavailable)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(unavailable)?;
    tmp.write_all(bytes).map_err(unavailable)?;
    tmp.as_file().sync_all().map_err(unavailable)?;
    tmp.persist(path).map_err(|e| unavailable(e.error))?;
    Ok(())
}

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[async_trait]
impl VectorStore for FileVectorStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn add(&self, records: Vec<NewRecord>) -> RagResult<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut guard = self.records.write().await;

        let expected = guard
            .first()
            .map_or_else(|| records[0].embedding.len(), VectorRecord::dimension);
        if expected == 0 {
            return Err(RagError::InvalidInput("embedding must not be empty".to_string()));
        }
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != expected) {
            return Err(RagError::InvalidInput(format!(
                "embedding has dimension {}, store expects {expected}",
                bad.embedding.len()
            )));
        }
        if records.iter().any(|r| !all_finite(&r.embedding)) {
            return Err(RagError::InvalidInput(
                "embedding contains a non-finite value".to_string(),
            ));
        }

        let new: Vec<VectorRecord> = records.into_iter().map(NewRecord::into_record).collect();
        let ids: Vec<String> = new.iter().map(|r| r.id.clone()).collect();
        guard.extend(new);

        debug!(added = ids.len(), total = guard.len(), "appended records");
        Ok(ids)
    }

    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> RagResult<Vec<ScoredRecord>> {
        if top_k == 0 {
            return Err(RagError::InvalidInput("top_k must be greater than 0".to_string()));
        }

        let records = self.records.read().await;
        let Some(dimension) = records.first().map(VectorRecord::dimension) else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(RagError::InvalidInput(format!(
                "query has dimension {}, store holds dimension {dimension}",
                query.len()
            )));
        }
        if !all_finite(query) {
            return Err(RagError::InvalidInput(
                "query contains a non-finite value".to_string(),
            ));
        }

        let mut scored: Vec<(usize, f32)> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.is_none_or(|f| f.matches(&r.metadata)))
            .map(|(i, r)| (i, cosine_similarity(query, &r.embedding)))
            .collect();

        // stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredRecord {
                record: records[i].clone(),
                score,
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> RagResult<usize> {
        let targets: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !targets.contains(r.id.as_str()));
        Ok(before - records.len())
    }

    async fn count(&self) -> RagResult<usize> {
        Ok(self.records.read().await.len())
    }
}
