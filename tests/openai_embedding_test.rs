//! OpenAI embedding adapter against a mock HTTP server
//!
//! Covers request shape, response reordering and the retry policy for
//! transient failures.

use mockito::{Matcher, Server};
use ragline::adapters::embeddings::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider, RetryPolicy};
use ragline::{EmbeddingProvider, EmbeddingService, ErrorKind};
use serde_json::json;
use std::sync::Arc;

fn provider_for(server: &Server, max_batch_size: usize) -> OpenAiEmbeddingProvider {
    let config = OpenAiEmbeddingConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.url(),
        model: "test-embed".to_string(),
        dimension: 3,
        timeout_secs: 5,
        max_batch_size,
        retry: RetryPolicy::new(2, 10, 50),
    };
    OpenAiEmbeddingProvider::new(config).expect("Failed to create provider")
}

fn embeddings_body(vectors: &[(usize, [f32; 3])]) -> String {
    let data: Vec<_> = vectors
        .iter()
        .map(|(index, embedding)| {
            json!({ "object": "embedding", "index": index, "embedding": embedding })
        })
        .collect();
    json!({ "object": "list", "data": data, "model": "test-embed" }).to_string()
}

#[tokio::test]
async fn test_embed_batch_sends_model_and_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-embed",
            "input": ["alpha", "beta"],
            "encoding_format": "float"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[(0, [1.0, 0.0, 0.0]), (1, [0.0, 1.0, 0.0])]))
        .expect(1)
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    let vectors = provider
        .embed_batch(&["alpha".to_string(), "beta".to_string()])
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_out_of_order_response_is_reordered_by_index() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embeddings_body(&[
            (2, [0.0, 0.0, 1.0]),
            (0, [1.0, 0.0, 0.0]),
            (1, [0.0, 1.0, 0.0]),
        ]))
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    let texts: Vec<String> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
    let vectors = provider.embed_batch(&texts).await.unwrap();

    assert_eq!(vectors[0], vec![1.0, 0.0, 0.0]);
    assert_eq!(vectors[2], vec![0.0, 0.0, 1.0]);
}

#[tokio::test]
async fn test_retry_on_500_server_error() {
    let mut server = Server::new_async().await;

    let mock_error = server
        .mock("POST", "/embeddings")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let mock_success = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embeddings_body(&[(0, [0.5, 0.5, 0.0])]))
        .expect(1)
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    let vector = provider.embed("hello").await;

    assert!(vector.is_ok(), "Should succeed after retry on 500");
    mock_error.assert_async().await;
    mock_success.assert_async().await;
}

#[tokio::test]
async fn test_retry_on_429_rate_limit_error() {
    let mut server = Server::new_async().await;

    let mock_limited = server
        .mock("POST", "/embeddings")
        .with_status(429)
        .with_body(r#"{"error":{"message":"rate limited"}}"#)
        .expect(1)
        .create_async()
        .await;

    let mock_success = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embeddings_body(&[(0, [0.0, 1.0, 0.0])]))
        .expect(1)
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    assert_eq!(provider.embed("hello").await.unwrap(), vec![0.0, 1.0, 0.0]);
    mock_limited.assert_async().await;
    mock_success.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(401)
        .with_body(r#"{"error":{"message":"bad key"}}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    let err = provider.embed("hello").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Embedding);
    assert!(!err.is_retryable());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_retries_exhausted_remain_retryable() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    let err = provider.embed("hello").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Embedding);
    assert!(err.is_retryable());
    mock.assert_async().await;
}

#[test]
fn test_missing_key_is_configuration_error() {
    let config = OpenAiEmbeddingConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".to_string(),
        retry: RetryPolicy::new(2, 10, 50),
        ..OpenAiEmbeddingConfig::default()
    };

    temp_env::with_var_unset("OPENAI_API_KEY", || {
        let provider = OpenAiEmbeddingProvider::new(config).unwrap();
        let err = tokio_test::block_on(provider.embed("hello")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_retryable());
    });
}

#[tokio::test]
async fn test_service_splits_into_provider_batches() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embeddings_body(&[(0, [1.0, 0.0, 0.0]), (1, [0.0, 1.0, 0.0])]))
        .expect(2)
        .create_async()
        .await;

    let service = EmbeddingService::new(Arc::new(provider_for(&server, 2)));
    let texts: Vec<String> = (0..4).map(|i| format!("text {i}")).collect();
    let vectors = service.embed_texts(&texts).await.unwrap();

    assert_eq!(vectors.len(), 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_short_response_is_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embeddings_body(&[(0, [1.0, 0.0, 0.0])]))
        .create_async()
        .await;

    let provider = provider_for(&server, 16);
    let err = provider
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Embedding);
    assert!(!err.is_retryable());
}
