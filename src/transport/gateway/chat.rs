use super::AppState;
use super::handlers::error_response;
use crate::core::chat::{ChatMessage, TurnEvent};
use crate::error::ChatError;
use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::convert::Infallible;

#[derive(Debug, Deserialize)]
pub(super) struct ChatRequestBody {
    messages: Vec<ChatMessage>,
}

/// One server-sent event frame.
fn sse_frame(event: &str, data: &serde_json::Value) -> String {
    format!("event: {event}\ndata: {data}\n\n")
}

fn frame_for(event: &TurnEvent) -> String {
    match event {
        TurnEvent::Fragment(text) => sse_frame("delta", &serde_json::Value::String(text.clone())),
        TurnEvent::Done => sse_frame("done", &serde_json::json!({})),
        TurnEvent::Error(message) => sse_frame("error", &serde_json::json!({ "message": message })),
    }
}

fn pre_stream_status(error: &ChatError) -> StatusCode {
    match error {
        e if e.is_caller_error() => StatusCode::BAD_REQUEST,
        ChatError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ChatError::Prompt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// POST /api/chat
pub(super) async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequestBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let mut turn = match state.chat.start_turn(body.messages).await {
        Ok(turn) => turn,
        Err(error) => {
            let status = pre_stream_status(&error);
            tracing::warn!(%error, status = status.as_u16(), "Chat turn rejected before streaming");
            return error_response(status, error.to_string());
        }
    };

    let turn_id = turn.turn_id;
    let stream = async_stream::stream! {
        while let Some(event) = turn.events.recv().await {
            let terminal = !matches!(event, TurnEvent::Fragment(_));
            yield Ok::<_, Infallible>(frame_for(&event));
            if terminal {
                return;
            }
        }
        yield Ok(frame_for(&TurnEvent::Error("stream closed unexpectedly".into())));
    };

    let mut response = Response::new(Body::from_stream(stream));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if let Ok(value) = HeaderValue::from_str(&turn_id.to_string()) {
        headers.insert("x-turn-id", value);
    }
    response.into_response()
}
