use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 3000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Allow binding to non-localhost addresses (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
    /// Origins allowed by the CORS layer; empty disables CORS headers
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Upper bound on one chat turn, including streaming (default: 30s)
    #[serde(default = "default_turn_timeout_secs")]
    pub turn_timeout_secs: u64,
    /// Capacity of the per-turn fragment channel
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_turn_timeout_secs() -> u64 {
    30
}

fn default_stream_buffer() -> usize {
    32
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            allow_public_bind: false,
            cors_origins: Vec::new(),
            turn_timeout_secs: default_turn_timeout_secs(),
            stream_buffer: default_stream_buffer(),
        }
    }
}
