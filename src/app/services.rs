use crate::config::{ClassifierMode, Config};
use crate::core::chat::{
    ChatOrchestrator, CompletionGateway, DelegatedClassifier, IntentClassifier, ModelClassifier,
};
use crate::core::lookups::{
    AviationWeatherClient, FlightPlanDatabaseClient, NominatimGeocoder, RouteLookup, WeatherLookup,
};
use crate::core::providers::{OpenAiProvider, Provider};
use crate::core::retrieval::{OpenAiEmbedding, PineconeIndex, Retriever};
use crate::prompt::PromptAssembler;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

/// Every upstream client, built once from configuration.
#[derive(Clone)]
pub struct Services {
    pub chat: Arc<ChatOrchestrator>,
    pub weather: WeatherLookup,
    pub routes: RouteLookup,
}

impl Services {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let lookups = &config.lookups;

        if config.llm.api_key.is_none() {
            tracing::warn!("No LLM API key configured; chat turns will fail");
        }
        if config.retrieval.index_host.trim().is_empty() {
            tracing::warn!("retrieval.index_host is not set; chat turns will fail at retrieval");
        }

        let provider: Arc<dyn Provider> = Arc::new(OpenAiProvider::new(
            &config.llm.base_url,
            config.llm.api_key.as_deref(),
            config.llm.timeout_secs,
        ));

        let retriever = Retriever::new(
            Arc::new(OpenAiEmbedding::new(
                &config.embedding.base_url,
                config.embedding_api_key().unwrap_or_default(),
                &config.embedding.model,
                config.embedding.dimensions,
            )
            .with_timeout(config.embedding.timeout_secs)),
            Arc::new(PineconeIndex::new(
                &config.retrieval.index_host,
                config.retrieval.api_key.as_deref().unwrap_or_default(),
                config.retrieval.namespace.as_deref(),
                config.retrieval.timeout_secs,
            )),
            config.retrieval.top_k,
        );

        let classifier: Arc<dyn IntentClassifier> = match config.policy.classifier {
            ClassifierMode::Delegated => Arc::new(DelegatedClassifier),
            ClassifierMode::Model => Arc::new(ModelClassifier::new(
                Arc::clone(&provider),
                config.llm.model.clone(),
            )),
        };

        let assembler = PromptAssembler::new().context("build prompt assembler")?;
        let completions = CompletionGateway::new(
            provider,
            config.llm.model.clone(),
            config.llm.temperature,
            config.gateway.stream_buffer,
        );

        let chat = ChatOrchestrator::new(
            retriever,
            classifier,
            Arc::new(assembler),
            completions,
            Duration::from_secs(config.gateway.turn_timeout_secs),
        );

        let geocoder = Arc::new(NominatimGeocoder::new(
            &lookups.geocoder_url,
            &lookups.user_agent,
            lookups.timeout_secs,
        ));
        let weather = WeatherLookup::new(
            Arc::new(AviationWeatherClient::new(
                &lookups.weather_url,
                &lookups.user_agent,
                lookups.timeout_secs,
            )),
            geocoder,
        );
        let routes = RouteLookup::new(Arc::new(FlightPlanDatabaseClient::new(
            &lookups.route_url,
            &lookups.user_agent,
            lookups.timeout_secs,
        )));

        tracing::debug!(
            model = %config.llm.model,
            classifier = %config.policy.classifier,
            top_k = config.retrieval.top_k,
            "Services ready"
        );

        Ok(Self {
            chat: Arc::new(chat),
            weather,
            routes,
        })
    }
}
