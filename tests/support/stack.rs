#![allow(dead_code)]

use aviation_ai::Config;
use aviation_ai::app::Services;
use aviation_ai::transport::gateway::{AppState, build_app};
use serde_json::json;
use wiremock::MockServer;

pub const EMBEDDING_DIMS: usize = 3;

/// Config whose every upstream points at `upstream`.
pub fn config_for(upstream: &MockServer) -> Config {
    let mut config = Config::default();
    let uri = upstream.uri();
    config.llm.base_url = uri.clone();
    config.llm.api_key = Some("sk-test".into());
    config.llm.model = "gpt-test".into();
    config.embedding.base_url = uri.clone();
    config.embedding.dimensions = EMBEDDING_DIMS;
    config.retrieval.index_host = uri.clone();
    config.retrieval.api_key = Some("pcsk_test".into());
    config.lookups.geocoder_url = uri.clone();
    config.lookups.weather_url = uri.clone();
    config.lookups.route_url = uri;
    config.lookups.timeout_secs = 5;
    config.gateway.turn_timeout_secs = 10;
    config
}

/// Serves the gateway on an ephemeral loopback port; returns its base URL.
pub async fn spawn_gateway(config: &Config) -> String {
    let state = AppState::from(Services::from_config(config).unwrap());
    let app = build_app(state, &config.gateway);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn embedding_body() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [{"object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3]}],
        "model": "text-embedding-3-small"
    })
}

pub fn index_body(texts: &[&str]) -> serde_json::Value {
    let matches: Vec<_> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "id": format!("chunk-{i}"),
                "score": 0.9 - (i as f64) * 0.1,
                "metadata": {"text": text, "source": "PHAK"}
            })
        })
        .collect();
    json!({ "matches": matches, "namespace": "" })
}

/// OpenAI streaming body made of one chunk per fragment.
pub fn completion_stream(fragments: &[&str], finish: bool) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let chunk = json!({
            "id": "chatcmpl-1",
            "model": "gpt-test",
            "choices": [{"index": 0, "delta": {"content": fragment}, "finish_reason": null}]
        });
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    if finish {
        let last = json!({
            "id": "chatcmpl-1",
            "model": "gpt-test",
            "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]
        });
        body.push_str(&format!("data: {last}\n\ndata: [DONE]\n\n"));
    }
    body
}

/// `(event, data)` pairs from a server-sent event body.
pub fn parse_frames(body: &str) -> Vec<(String, serde_json::Value)> {
    body.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let mut event = String::new();
            let mut data = serde_json::Value::Null;
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event: ") {
                    event = name.to_string();
                } else if let Some(payload) = line.strip_prefix("data: ") {
                    data = serde_json::from_str(payload).unwrap();
                }
            }
            (event, data)
        })
        .collect()
}
