use crate::core::chat::message::ChatMessage;
use crate::core::providers::{Provider, ProviderChatRequest};
use crate::prompt::policy::CLASSIFIER_INSTRUCTION;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};

/// What the latest user message is asking for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QueryIntent {
    Greeting,
    Identity,
    OffTopic,
    /// A question about the assistant's sources or coverage.
    Metadata,
    Quiz,
    Procedure,
    /// Left to the generator to decide under the full policy.
    Unclassified,
}

impl QueryIntent {
    /// Parse a free-form model label. Anything unrecognized is `Unclassified`.
    pub fn from_label(raw: &str) -> Self {
        let label = raw
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .replace('-', "_");
        Self::from_str(&label).unwrap_or(Self::Unclassified)
    }
}

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Never fails; an undecidable query is `Unclassified`.
    async fn classify(&self, query: &str) -> QueryIntent;
}

/// Leaves classification to the generation call itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelegatedClassifier;

#[async_trait]
impl IntentClassifier for DelegatedClassifier {
    fn name(&self) -> &str {
        "delegated"
    }

    async fn classify(&self, _query: &str) -> QueryIntent {
        QueryIntent::Unclassified
    }
}

/// Asks the model for a single label with a short non-streamed call.
pub struct ModelClassifier {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ModelClassifier {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl IntentClassifier for ModelClassifier {
    fn name(&self) -> &str {
        "model"
    }

    async fn classify(&self, query: &str) -> QueryIntent {
        let request = ProviderChatRequest {
            messages: vec![
                ChatMessage::system(CLASSIFIER_INSTRUCTION),
                ChatMessage::user(query),
            ],
            model: self.model.clone(),
            temperature: 0.0,
        };

        match self.provider.complete(request).await {
            Ok(response) => {
                let intent = QueryIntent::from_label(&response.text);
                tracing::debug!(label = %response.text.trim(), %intent, "Classified query");
                intent
            }
            Err(error) => {
                tracing::warn!(provider = self.provider.name(), "Intent classification failed: {error:#}");
                QueryIntent::Unclassified
            }
        }
    }
}
