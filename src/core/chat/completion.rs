use crate::core::chat::message::ChatMessage;
use crate::core::providers::{Provider, ProviderChatRequest, StreamEvent};
use crate::error::ChatError;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::Instrument;

/// What a caller sees of a turn. `Done` and `Error` are terminal and
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    Fragment(String),
    Done,
    Error(String),
}

/// Wall-clock budget shared by every step of one chat turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnDeadline {
    at: Instant,
    budget: Duration,
}

impl TurnDeadline {
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn budget_secs(&self) -> u64 {
        self.budget.as_secs()
    }

    pub fn exceeded(&self) -> ChatError {
        ChatError::Timeout(self.budget_secs())
    }
}

/// Relays one generation from a provider to a bounded channel.
///
/// The producer task stops and drops the upstream stream as soon as the
/// receiver is dropped or the deadline passes.
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    buffer: usize,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f64, buffer: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            buffer: buffer.max(1),
        }
    }

    pub fn stream(&self, messages: Vec<ChatMessage>, deadline: TurnDeadline) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel(self.buffer);
        let provider = Arc::clone(&self.provider);
        let request = ProviderChatRequest {
            messages,
            model: self.model.clone(),
            temperature: self.temperature,
        };

        let producer = async move {
            let outcome = tokio::select! {
                () = tx.closed() => {
                    tracing::debug!("Caller disconnected, dropping generation stream");
                    return;
                }
                outcome = tokio::time::timeout_at(deadline.at(), relay(provider.as_ref(), request, &tx)) => outcome,
            };

            let failure = match outcome {
                Ok(Ok(())) => return,
                Ok(Err(error)) => error,
                Err(_elapsed) => deadline.exceeded(),
            };
            tracing::warn!(%failure, "Generation ended with an error");
            let _ = tx.send(TurnEvent::Error(failure.to_string())).await;
        };

        tokio::spawn(producer.instrument(tracing::Span::current()));
        rx
    }

    /// Channel that yields `reply` as a single fragment and completes.
    pub fn fixed(&self, reply: &str) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel(2);
        // Capacity 2 fits both events, so neither send can wait.
        let _ = tx.try_send(TurnEvent::Fragment(reply.to_string()));
        let _ = tx.try_send(TurnEvent::Done);
        rx
    }
}

/// `Ok` once `Done` was delivered or the receiver went away.
async fn relay(
    provider: &dyn Provider,
    request: ProviderChatRequest,
    tx: &mpsc::Sender<TurnEvent>,
) -> Result<(), ChatError> {
    let mut stream = provider
        .chat_stream(request)
        .await
        .map_err(|e| ChatError::Generation(format!("{e:#}")))?;

    while let Some(event) = stream.next().await {
        match event.map_err(|e| ChatError::Generation(format!("{e:#}")))? {
            StreamEvent::ResponseStart { model } => {
                tracing::debug!(provider = provider.name(), ?model, "Generation started");
            }
            StreamEvent::TextDelta { text } => {
                if tx.send(TurnEvent::Fragment(text)).await.is_err() {
                    return Ok(());
                }
            }
            StreamEvent::Done {
                stop_reason,
                output_tokens,
                ..
            } => {
                tracing::debug!(?stop_reason, ?output_tokens, "Generation complete");
                let _ = tx.send(TurnEvent::Done).await;
                return Ok(());
            }
        }
    }

    Err(ChatError::Generation(
        "generation stream ended without completion".into(),
    ))
}
