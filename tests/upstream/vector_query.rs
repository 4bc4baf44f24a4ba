use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aviation_ai::core::retrieval::{PineconeIndex, VectorIndex};

#[tokio::test]
async fn query_sends_top_k_and_namespace_and_maps_metadata_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("api-key", "pcsk_key"))
        .and(body_json(json!({
            "vector": [0.5, 0.25],
            "topK": 4,
            "includeMetadata": true,
            "namespace": "phak"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                {"id": "a", "score": 0.91, "metadata": {"text": "Load factor rises in a turn.", "page": 5}},
                {"id": "b", "score": 0.42}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let index = PineconeIndex::new(&server.uri(), "pcsk_key", Some("phak"), 5);
    let hits = index.query(&[0.5, 0.25], 4).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].text, "Load factor rises in a turn.");
    assert_eq!(hits[0].metadata["page"], 5);
    assert!(hits[1].text.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn blank_namespace_is_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"vector": [1.0], "topK": 1, "includeMetadata": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
        .expect(1)
        .mount(&server)
        .await;

    let index = PineconeIndex::new(&server.uri(), "k", Some("  "), 5);
    assert!(index.query(&[1.0], 1).await.unwrap().is_empty());
    server.verify().await;
}

#[tokio::test]
async fn index_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let index = PineconeIndex::new(&server.uri(), "k", None, 5);
    let err = index.query(&[1.0], 1).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}
