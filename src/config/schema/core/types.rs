use super::super::{
    EmbeddingConfig, GatewayConfig, LlmConfig, LookupsConfig, PolicyConfig, RetrievalConfig,
};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Default tracing level when `--verbose` is not given
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub lookups: LookupsConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Directory holding `config.toml` (`~/.aviation-ai`).
    pub fn home_dir() -> PathBuf {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        home.join(".aviation-ai")
    }

    /// Key used for embedding calls: the dedicated key, else the LLM key.
    pub fn embedding_api_key(&self) -> Option<&str> {
        self.embedding
            .api_key
            .as_deref()
            .or(self.llm.api_key.as_deref())
            .filter(|key| !key.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: Self::home_dir().join("config.toml"),
            log_level: default_log_level(),
            gateway: GatewayConfig::default(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            lookups: LookupsConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}
