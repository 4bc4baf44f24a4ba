use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aviation_ai::core::chat::ChatMessage;
use aviation_ai::core::providers::{
    OpenAiProvider, Provider, ProviderChatRequest, StopReason, StreamEvent,
};

fn request() -> ProviderChatRequest {
    ProviderChatRequest {
        messages: vec![
            ChatMessage::system("You are a flight instructor."),
            ChatMessage::user("What is Vy?"),
        ],
        model: "gpt-test".into(),
        temperature: 0.3,
    }
}

fn chunk(content: Option<&str>, finish: Option<&str>) -> String {
    let delta = content.map_or_else(|| json!({}), |c| json!({"content": c}));
    let frame = json!({
        "id": "c1",
        "model": "gpt-test",
        "choices": [{"index": 0, "delta": delta, "finish_reason": finish}]
    });
    format!("data: {frame}\r\n\r\n")
}

#[tokio::test]
async fn streams_text_and_usage_until_done() {
    let server = MockServer::start().await;
    let usage = json!({"id": "c1", "model": "gpt-test", "choices": [],
        "usage": {"prompt_tokens": 21, "completion_tokens": 3}});
    let body = format!(
        "{}{}{}data: {usage}\n\ndata: [DONE]\n\n",
        chunk(Some("Best "), None),
        chunk(Some("rate."), None),
        chunk(None, Some("stop")),
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "stream": true,
            "messages": [{"role": "system"}, {"role": "user", "content": "What is Vy?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), Some("sk-test"), 10);
    let events: Vec<StreamEvent> = provider
        .chat_stream(request())
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await;

    let text: String = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::TextDelta { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "Best rate.");
    assert_eq!(
        events.last(),
        Some(&StreamEvent::Done {
            stop_reason: Some(StopReason::EndTurn),
            input_tokens: Some(21),
            output_tokens: Some(3),
        })
    );
}

#[tokio::test]
async fn complete_collects_the_whole_answer() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}data: [DONE]\n\n",
        chunk(Some("74 knots"), None),
        chunk(None, Some("stop"))
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), Some("sk-test"), 10);
    let response = provider.complete(request()).await.unwrap();
    assert_eq!(response.text, "74 knots");
}

#[tokio::test]
async fn truncated_stream_ends_in_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(chunk(Some("Best "), None), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), Some("sk-test"), 10);
    let events: Vec<_> = provider.chat_stream(request()).await.unwrap().collect().await;

    assert!(matches!(events[0], Ok(StreamEvent::ResponseStart { .. })));
    assert!(events.last().unwrap().is_err());
}

#[tokio::test]
async fn unauthorized_is_reported_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&server.uri(), Some("sk-bad"), 10);
    let Err(err) = provider.chat_stream(request()).await else {
        panic!("expected an authentication failure");
    };
    assert!(err.to_string().contains("OpenAI"));
}
