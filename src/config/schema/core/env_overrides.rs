use super::Config;

fn non_empty_var(primary: &str, fallback: Option<&str>) -> Option<String> {
    std::env::var(primary)
        .ok()
        .or_else(|| fallback.and_then(|name| std::env::var(name).ok()))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = non_empty_var("AVIATION_AI_OPENAI_API_KEY", Some("OPENAI_API_KEY")) {
            self.llm.api_key = Some(key);
        }

        if let Some(key) = non_empty_var("AVIATION_AI_PINECONE_API_KEY", Some("PINECONE_API_KEY")) {
            self.retrieval.api_key = Some(key);
        }

        if let Some(host) = non_empty_var("AVIATION_AI_PINECONE_HOST", None) {
            self.retrieval.index_host = host;
        }

        if let Some(model) = non_empty_var("AVIATION_AI_MODEL", None) {
            self.llm.model = model;
        }

        if let Some(port_str) = non_empty_var("AVIATION_AI_PORT", Some("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(host) = non_empty_var("AVIATION_AI_HOST", None) {
            self.gateway.host = host;
        }
    }
}
