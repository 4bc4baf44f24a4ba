use super::Config;
use crate::error::ConfigError;

fn check_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| ConfigError::Validation(format!("{field} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "{field} must use http(s), got {other}"
        ))),
    }
}

impl Config {
    /// Structural checks applied after loading. Missing credentials are not
    /// rejected here; the services that need them fail at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Validation(
                "retrieval.top_k must be at least 1".into(),
            ));
        }
        if self.embedding.dimensions == 0 {
            return Err(ConfigError::Validation(
                "embedding.dimensions must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Validation(format!(
                "llm.temperature {} is outside 0.0..=2.0",
                self.llm.temperature
            )));
        }
        for (field, secs) in [
            ("llm.timeout_secs", self.llm.timeout_secs),
            ("embedding.timeout_secs", self.embedding.timeout_secs),
            ("retrieval.timeout_secs", self.retrieval.timeout_secs),
            ("lookups.timeout_secs", self.lookups.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation(format!("{field} must be at least 1")));
            }
        }
        if self.gateway.turn_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway.turn_timeout_secs must be at least 1".into(),
            ));
        }

        check_url("llm.base_url", &self.llm.base_url)?;
        check_url("embedding.base_url", &self.embedding.base_url)?;
        check_url("lookups.geocoder_url", &self.lookups.geocoder_url)?;
        check_url("lookups.weather_url", &self.lookups.weather_url)?;
        check_url("lookups.route_url", &self.lookups.route_url)?;
        if !self.retrieval.index_host.trim().is_empty() {
            check_url("retrieval.index_host", &self.retrieval.index_host)?;
        }

        if self.lookups.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "lookups.user_agent must identify the application".into(),
            ));
        }

        Ok(())
    }
}
