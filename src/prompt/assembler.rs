use super::engine::TeraEngine;
use super::policy::{
    FULL_POLICY_NAME, FULL_POLICY_TEMPLATE, GENERAL_KNOWLEDGE_NAME, GENERAL_KNOWLEDGE_TEMPLATE,
    GROUNDED_NAME, GROUNDED_TEMPLATE, INTRODUCTION_NAME, INTRODUCTION_TEMPLATE, OFF_TOPIC_REFUSAL,
    PERSONA, POLICY_VERSION, PROCEDURE_UNAVAILABLE, QUIZ_NAME, QUIZ_TEMPLATE, RESPONSE_SHAPE,
};
use crate::core::chat::intent::QueryIntent;
use crate::core::chat::message::ChatMessage;
use crate::core::retrieval::RetrievedHit;
use crate::error::PromptError;
use serde::Serialize;
use strum::Display;
use tera::Context;

/// Which rule of the answer policy applies to a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PolicyBranch {
    OffTopicRefusal,
    Grounded,
    GeneralKnowledge,
    Quiz,
    ProcedureUnavailable,
    Introduction,
    FullPolicy,
}

impl PolicyBranch {
    /// The off-topic gate wins over everything, then retrieved context,
    /// then the intent-specific fallbacks.
    pub fn select(intent: QueryIntent, has_hits: bool) -> Self {
        match (intent, has_hits) {
            (QueryIntent::OffTopic, _) => Self::OffTopicRefusal,
            (_, true) => Self::Grounded,
            (QueryIntent::Metadata, false) => Self::GeneralKnowledge,
            (QueryIntent::Quiz, false) => Self::Quiz,
            (QueryIntent::Procedure, false) => Self::ProcedureUnavailable,
            (QueryIntent::Greeting | QueryIntent::Identity, false) => Self::Introduction,
            (QueryIntent::Unclassified, false) => Self::FullPolicy,
        }
    }

    fn fixed_reply(self) -> Option<&'static str> {
        match self {
            Self::OffTopicRefusal => Some(OFF_TOPIC_REFUSAL),
            Self::ProcedureUnavailable => Some(PROCEDURE_UNAVAILABLE),
            Self::Grounded
            | Self::GeneralKnowledge
            | Self::Quiz
            | Self::Introduction
            | Self::FullPolicy => None,
        }
    }

    fn template_name(self) -> Option<&'static str> {
        match self {
            Self::Grounded => Some(GROUNDED_NAME),
            Self::GeneralKnowledge => Some(GENERAL_KNOWLEDGE_NAME),
            Self::Quiz => Some(QUIZ_NAME),
            Self::Introduction => Some(INTRODUCTION_NAME),
            Self::FullPolicy => Some(FULL_POLICY_NAME),
            Self::OffTopicRefusal | Self::ProcedureUnavailable => None,
        }
    }
}

/// Outcome of prompt assembly for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AssembledPrompt {
    /// Send `messages` (system instruction first) to the generator.
    Generate {
        branch: PolicyBranch,
        system_instruction: String,
        messages: Vec<ChatMessage>,
    },
    /// Answer with fixed text; no generation call.
    Fixed {
        branch: PolicyBranch,
        reply: &'static str,
    },
}

impl AssembledPrompt {
    pub fn branch(&self) -> PolicyBranch {
        match self {
            Self::Generate { branch, .. } | Self::Fixed { branch, .. } => *branch,
        }
    }
}

#[derive(Serialize)]
struct HitView<'a> {
    text: &'a str,
    score: String,
    metadata: String,
}

impl<'a> From<&'a RetrievedHit> for HitView<'a> {
    fn from(hit: &'a RetrievedHit) -> Self {
        Self {
            text: &hit.text,
            score: format!("{:.3}", hit.score),
            metadata: serde_json::to_string(&hit.metadata).unwrap_or_else(|_| "{}".into()),
        }
    }
}

/// Builds the per-turn system instruction from the answer policy.
pub struct PromptAssembler {
    engine: TeraEngine,
}

impl PromptAssembler {
    pub fn new() -> Result<Self, PromptError> {
        let engine = TeraEngine::with_templates(&[
            (GROUNDED_NAME, GROUNDED_TEMPLATE),
            (GENERAL_KNOWLEDGE_NAME, GENERAL_KNOWLEDGE_TEMPLATE),
            (QUIZ_NAME, QUIZ_TEMPLATE),
            (INTRODUCTION_NAME, INTRODUCTION_TEMPLATE),
            (FULL_POLICY_NAME, FULL_POLICY_TEMPLATE),
        ])?;
        Ok(Self { engine })
    }

    pub fn policy_version(&self) -> &'static str {
        POLICY_VERSION
    }

    /// `history` is copied after the system instruction without changes.
    pub fn assemble(
        &self,
        query: &str,
        hits: &[RetrievedHit],
        history: &[ChatMessage],
        intent: QueryIntent,
    ) -> Result<AssembledPrompt, PromptError> {
        let branch = PolicyBranch::select(intent, !hits.is_empty());

        if let Some(reply) = branch.fixed_reply() {
            return Ok(AssembledPrompt::Fixed { branch, reply });
        }
        let Some(template) = branch.template_name() else {
            return Err(PromptError::NotFound(branch.to_string()));
        };

        let mut ctx = Context::new();
        ctx.insert("persona", PERSONA);
        ctx.insert("response_shape", RESPONSE_SHAPE);
        ctx.insert("off_topic_refusal", OFF_TOPIC_REFUSAL);
        ctx.insert("procedure_unavailable", PROCEDURE_UNAVAILABLE);
        ctx.insert("query", query);
        // A delegated intent means the model still has to apply the gate.
        ctx.insert("relevance_gate", &(intent == QueryIntent::Unclassified));
        ctx.insert(
            "hits",
            &hits.iter().map(HitView::from).collect::<Vec<_>>(),
        );

        let system_instruction = self.engine.render(template, &ctx)?;

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_instruction.clone()));
        messages.extend_from_slice(history);

        Ok(AssembledPrompt::Generate {
            branch,
            system_instruction,
            messages,
        })
    }
}
