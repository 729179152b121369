//! Behaviour of the file-backed vector store across batches and restarts

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use ragline::{ErrorKind, FileVectorStore, Metadata, MetadataFilter, NewRecord, VectorStore};

fn record(content: &str, embedding: Vec<f32>) -> NewRecord {
    NewRecord::new(content, embedding, Metadata::new().with("content", content))
}

#[tokio::test]
async fn test_two_batches_are_searchable_together() {
    let (_dir, path) = common::temp_snapshot_path();
    let store = FileVectorStore::new(&path);

    let first = store
        .add(vec![record("x", vec![1.0, 0.0, 0.0]), record("y", vec![0.0, 1.0, 0.0])])
        .await
        .unwrap();
    let second = store
        .add(vec![record("z", vec![0.0, 0.0, 1.0])])
        .await
        .unwrap();

    assert_eq!(first.len() + second.len(), 3);
    assert_eq!(store.count().await.unwrap(), 3);

    let hits = store.search(&[0.1, 0.1, 1.0], 1, None).await.unwrap();
    assert_eq!(hits[0].record.content, "z");
    assert_eq!(hits[0].record.id, second[0]);
}

#[tokio::test]
async fn test_save_load_preserves_content_and_scores() {
    let (_dir, path) = common::temp_snapshot_path();
    let store = FileVectorStore::new(&path);
    store
        .add(vec![
            record("first", vec![0.6, 0.8]),
            NewRecord::new(
                "second",
                vec![0.8, 0.6],
                Metadata::new().with("source", "docs/ü.txt"),
            ),
        ])
        .await
        .unwrap();
    let before = store.search(&[1.0, 0.0], 2, None).await.unwrap();
    store.save().await.unwrap();

    let restored = FileVectorStore::open(&path).await.unwrap();
    let after = restored.search(&[1.0, 0.0], 2, None).await.unwrap();

    assert_eq!(before, after);
    assert_eq!(after[0].record.metadata.get("source"), Some("docs/ü.txt"));
}

#[tokio::test]
async fn test_concurrent_adds_keep_every_record() {
    let (_dir, path) = common::temp_snapshot_path();
    let store = Arc::new(FileVectorStore::new(&path));

    let handles: Vec<_> = (0..8)
        .map(|task| {
            let store = store.clone();
            tokio::spawn(async move {
                let batch = (0..10)
                    .map(|i| record(&format!("{task}-{i}"), vec![1.0, task as f32]))
                    .collect();
                store.add(batch).await.unwrap()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.extend(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 80);
    assert_eq!(store.count().await.unwrap(), 80);
}

#[tokio::test]
async fn test_failed_load_keeps_existing_records() {
    let (_dir, path) = common::temp_snapshot_path();
    let store = FileVectorStore::new(&path);
    store.add(vec![record("kept", vec![1.0, 0.0])]).await.unwrap();

    std::fs::write(&path, b"[{\"id\": 1}]").unwrap();
    let err = store.load().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Corruption);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_then_save_drops_records_from_snapshot() {
    let (_dir, path) = common::temp_snapshot_path();
    let store = FileVectorStore::new(&path);
    let ids = store
        .add(vec![record("a", vec![1.0]), record("b", vec![2.0])])
        .await
        .unwrap();

    assert_eq!(store.delete(&[ids[0].clone(), "unknown".to_string()]).await.unwrap(), 1);
    store.save().await.unwrap();

    let restored = FileVectorStore::open(&path).await.unwrap();
    let contents: Vec<String> = restored.records().await.into_iter().map(|r| r.content).collect();
    assert_eq!(contents, vec!["b"]);
}

#[tokio::test]
async fn test_repeated_search_returns_identical_results() {
    let (_dir, path) = common::temp_snapshot_path();
    let store = FileVectorStore::new(&path);
    store
        .add(vec![
            record("right", vec![1.0, 0.0]),
            record("diag-1", vec![1.0, 1.0]),
            record("up", vec![0.0, 1.0]),
            record("diag-2", vec![2.0, 2.0]),
            record("diag-3", vec![3.0, 3.0]),
            record("away", vec![-1.0, -1.0]),
        ])
        .await
        .unwrap();

    let first = store.search(&[1.0, 1.0], 4, None).await.unwrap();
    let second = store.search(&[1.0, 1.0], 4, None).await.unwrap();
    assert_eq!(first, second);

    // both tie groups come back in insertion order
    let contents: Vec<&str> = first.iter().map(|h| h.record.content.as_str()).collect();
    assert_eq!(contents, vec!["diag-1", "diag-2", "diag-3", "right"]);

    let filter = MetadataFilter::is_in("content", ["up", "right", "away"]);
    let first = store.search(&[1.0, 1.0], 2, Some(&filter)).await.unwrap();
    let second = store.search(&[1.0, 1.0], 2, Some(&filter)).await.unwrap();
    assert_eq!(first, second);
    let contents: Vec<&str> = first.iter().map(|h| h.record.content.as_str()).collect();
    assert_eq!(contents, vec!["right", "up"]);
}
