mod core;
mod gateway;
mod lookups;
mod policy;
mod services;

pub use core::Config;
pub use gateway::GatewayConfig;
pub use lookups::LookupsConfig;
pub use policy::{ClassifierMode, PolicyConfig};
pub use services::{EmbeddingConfig, LlmConfig, RetrievalConfig};
