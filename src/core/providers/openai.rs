use super::openai_types::{ChatCompletionChunk, ChatRequest, Message, StreamOptions};
use crate::core::providers::{
    build_provider_client_with_timeout, sanitize_api_error,
    sse::{SseBuffer, SseData, parse_data_lines},
    streaming::{ProviderChatRequest, ProviderStream, StopReason, StreamEvent},
    traits::Provider,
};
use crate::error::LlmError;
use anyhow::Context;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};

const PROVIDER_NAME: &str = "OpenAI";

/// Streaming client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiProvider {
    completions_url: String,
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        Self {
            completions_url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            cached_auth_header: api_key
                .filter(|k| !k.trim().is_empty())
                .map(|k| format!("Bearer {k}")),
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    fn build_request(req: &ProviderChatRequest) -> ChatRequest<'_> {
        ChatRequest {
            model: &req.model,
            messages: req
                .messages
                .iter()
                .map(|m| Message {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: req.temperature,
            stream: true,
            stream_options: StreamOptions {
                include_usage: true,
            },
        }
    }

    async fn call_api_streaming(&self, request: &ChatRequest<'_>) -> anyhow::Result<reqwest::Response> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            anyhow::anyhow!("OpenAI API key not set. Set OPENAI_API_KEY or edit config.toml.")
        })?;

        let response = self
            .client
            .post(&self.completions_url)
            .header("Authorization", auth_header)
            .json(request)
            .send()
            .await
            .context("OpenAI request failed")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(LlmError::Auth {
                provider: PROVIDER_NAME.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            return Err(super::api_error(PROVIDER_NAME, response).await);
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn chat_stream(&self, req: ProviderChatRequest) -> anyhow::Result<ProviderStream> {
        let request = Self::build_request(&req);
        let response = self.call_api_streaming(&request).await?;
        let mut byte_stream = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut sse_buffer = SseBuffer::new();
            let mut sent_start = false;
            let mut stop_reason: Option<StopReason> = None;
            let mut usage: Option<(u64, u64)> = None;

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        yield Err(anyhow::Error::new(error).context("OpenAI stream interrupted"));
                        return;
                    }
                };
                sse_buffer.push_chunk(&bytes);

                while let Some(event_block) = sse_buffer.next_event_block() {
                    for data in parse_data_lines(&event_block) {
                        let payload = match data {
                            SseData::Payload(payload) => payload,
                            SseData::Done => {
                                yield Ok(StreamEvent::Done {
                                    stop_reason: stop_reason.or(Some(StopReason::EndTurn)),
                                    input_tokens: usage.map(|(input, _)| input),
                                    output_tokens: usage.map(|(_, output)| output),
                                });
                                return;
                            }
                        };

                        let chunk = match serde_json::from_str::<ChatCompletionChunk>(payload) {
                            Ok(chunk) => chunk,
                            Err(error) => {
                                tracing::debug!(%error, "Skipping unparseable OpenAI stream frame");
                                continue;
                            }
                        };

                        if let Some(api_error) = chunk.error {
                            yield Err(LlmError::Streaming(sanitize_api_error(&api_error.message)).into());
                            return;
                        }

                        if !sent_start {
                            yield Ok(StreamEvent::ResponseStart {
                                model: chunk.model.clone(),
                            });
                            sent_start = true;
                        }

                        if let Some(u) = &chunk.usage {
                            usage = Some((u.prompt_tokens, u.completion_tokens));
                        }

                        for choice in chunk.choices {
                            if let Some(content) = choice.delta.content
                                && !content.is_empty()
                            {
                                yield Ok(StreamEvent::TextDelta { text: content });
                            }
                            if let Some(finish) = choice.finish_reason.as_deref() {
                                stop_reason = Some(StopReason::from_finish_reason(finish));
                            }
                        }
                    }
                }
            }

            // Without [DONE], only an observed finish_reason counts as completion.
            match stop_reason {
                Some(reason) => {
                    yield Ok(StreamEvent::Done {
                        stop_reason: Some(reason),
                        input_tokens: usage.map(|(input, _)| input),
                        output_tokens: usage.map(|(_, output)| output),
                    });
                }
                None => {
                    yield Err(LlmError::Streaming(
                        "OpenAI stream ended before completion".to_string(),
                    )
                    .into());
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
