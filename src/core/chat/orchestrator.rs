use super::completion::{CompletionGateway, TurnDeadline, TurnEvent};
use super::intent::{IntentClassifier, QueryIntent};
use super::message::{ChatMessage, latest_user_text};
use crate::core::retrieval::Retriever;
use crate::error::ChatError;
use crate::prompt::{AssembledPrompt, PolicyBranch, PromptAssembler};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

/// Everything decided about a turn before generation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTurn {
    pub intent: QueryIntent,
    pub hit_count: usize,
    pub prompt: AssembledPrompt,
}

/// A started turn. Events end with exactly one `Done` or `Error`.
#[derive(Debug)]
pub struct TurnStream {
    pub turn_id: Uuid,
    pub branch: PolicyBranch,
    pub events: mpsc::Receiver<TurnEvent>,
}

/// Runs one chat turn: embed, retrieve, classify, assemble, generate.
#[derive(Clone)]
pub struct ChatOrchestrator {
    retriever: Retriever,
    classifier: Arc<dyn IntentClassifier>,
    assembler: Arc<PromptAssembler>,
    completions: CompletionGateway,
    turn_timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(
        retriever: Retriever,
        classifier: Arc<dyn IntentClassifier>,
        assembler: Arc<PromptAssembler>,
        completions: CompletionGateway,
        turn_timeout: Duration,
    ) -> Self {
        Self {
            retriever,
            classifier,
            assembler,
            completions,
            turn_timeout,
        }
    }

    /// Validate the conversation and run every step up to, but not
    /// including, generation.
    pub async fn prepare_turn(&self, messages: &[ChatMessage]) -> Result<PreparedTurn, ChatError> {
        let query = latest_user_text(messages).ok_or(ChatError::NoUserMessage)?;
        if query.trim().is_empty() {
            return Err(ChatError::EmptyUserMessage);
        }

        let hits = self.retriever.retrieve(query).await?;
        let intent = self.classifier.classify(query).await;
        let prompt = self.assembler.assemble(query, &hits, messages, intent)?;

        tracing::info!(
            hits = hits.len(),
            %intent,
            classifier = self.classifier.name(),
            branch = %prompt.branch(),
            policy = self.assembler.policy_version(),
            "Turn prepared"
        );

        Ok(PreparedTurn {
            intent,
            hit_count: hits.len(),
            prompt,
        })
    }

    /// Prepare a turn under the turn deadline and start delivering it.
    ///
    /// Errors here happen before any output; once a `TurnStream` is
    /// returned, failures arrive as `TurnEvent::Error`.
    pub async fn start_turn(&self, messages: Vec<ChatMessage>) -> Result<TurnStream, ChatError> {
        let turn_id = Uuid::new_v4();
        let span = tracing::info_span!("chat_turn", %turn_id);

        async move {
            let deadline = TurnDeadline::starting_now(self.turn_timeout);
            let prepared = tokio::time::timeout_at(deadline.at(), self.prepare_turn(&messages))
                .await
                .map_err(|_| deadline.exceeded())??;

            let branch = prepared.prompt.branch();
            let events = match prepared.prompt {
                AssembledPrompt::Fixed { reply, .. } => self.completions.fixed(reply),
                AssembledPrompt::Generate { messages, .. } => {
                    self.completions.stream(messages, deadline)
                }
            };

            Ok(TurnStream {
                turn_id,
                branch,
                events,
            })
        }
        .instrument(span)
        .await
    }
}
