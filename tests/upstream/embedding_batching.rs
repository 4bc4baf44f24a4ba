use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aviation_ai::core::retrieval::{EmbeddingProvider, OpenAiEmbedding, embed_query};
use aviation_ai::error::RetrievalError;

#[tokio::test]
async fn openai_embedder_batches_into_single_http_request() {
    let server = MockServer::start().await;

    let model = "text-embedding-3-small";
    let inputs = ["stall speed", "crosswind landing"];

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({"model": model, "input": inputs})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "model": model,
            "data": [
                {"object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3]},
                {"object": "embedding", "index": 1, "embedding": [0.4, 0.5, 0.6]}
            ],
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedding::new(&server.uri(), "test-key", model, 3);
    let vectors = embedder.embed(&inputs).await.unwrap();

    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[1], vec![0.4_f32, 0.5_f32, 0.6_f32]);
    server.verify().await;
}

#[tokio::test]
async fn wrong_dimension_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.1, 0.2]}]
        })))
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedding::new(&server.uri(), "test-key", "text-embedding-3-small", 3);
    let err = embed_query(&embedder, "What is Va?").await.unwrap_err();
    assert!(matches!(err, RetrievalError::DimensionMismatch { .. }));
}

#[tokio::test]
async fn upstream_error_does_not_leak_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("Incorrect API key provided: sk-live-abcdef"),
        )
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedding::new(&server.uri(), "sk-live-abcdef", "m", 3);
    let err = embedder.embed(&["hello"]).await.unwrap_err().to_string();
    assert!(err.contains("401"));
    assert!(!err.contains("sk-live-abcdef"));
}

#[tokio::test]
async fn configured_timeout_bounds_slow_embedding_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"index": 0, "embedding": [0.1, 0.2, 0.3]}]}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedding::new(&server.uri(), "test-key", "m", 3).with_timeout(1);
    let started = std::time::Instant::now();
    let err = embed_query(&embedder, "What is Va?").await.unwrap_err();

    assert!(matches!(err, RetrievalError::Embedding(_)));
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
}
