pub mod schema;

pub use schema::{
    ClassifierMode, Config, EmbeddingConfig, GatewayConfig, LlmConfig, LookupsConfig,
    PolicyConfig, RetrievalConfig,
};
