//! Benchmarks for exact search over the file-backed store.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ragline::adapters::embeddings::HashingEmbeddingProvider;
use ragline::{FileVectorStore, Metadata, MetadataFilter, NewRecord, VectorStore};
use std::hint::black_box;
use tokio::runtime::Runtime;

const DIMENSION: usize = 384;

fn populated_store(runtime: &Runtime, size: usize) -> FileVectorStore {
    let embedder = HashingEmbeddingProvider::new(DIMENSION).unwrap();
    let store = FileVectorStore::new("bench.json");
    let records = (0..size)
        .map(|i| {
            let text = format!("record {i} about topic {} and theme {}", i % 17, i % 5);
            NewRecord::new(
                text.clone(),
                embedder.embed_text(&text),
                Metadata::new().with("bucket", i % 4),
            )
        })
        .collect();
    runtime.block_on(store.add(records)).unwrap();
    store
}

fn bench_search(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let query = HashingEmbeddingProvider::new(DIMENSION)
        .unwrap()
        .embed_text("topic 3 and theme 2");

    let mut group = c.benchmark_group("file_store_search");
    for size in [1_000usize, 10_000] {
        let store = populated_store(&runtime, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("top_4", size), &store, |b, store| {
            b.to_async(&runtime)
                .iter(|| async { store.search(black_box(&query), 4, None).await.unwrap() });
        });

        let filter = MetadataFilter::eq("bucket", "1");
        group.bench_with_input(BenchmarkId::new("top_4_filtered", size), &store, |b, store| {
            b.to_async(&runtime).iter(|| async {
                store.search(black_box(&query), 4, Some(&filter)).await.unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
