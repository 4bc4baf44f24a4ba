use crate::core::providers::{build_identified_client, sanitize_api_error};
use crate::error::LookupError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SERVICE: &str = "flightplandatabase";

/// Best-match route between two airports. Only the encoded path is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub encoded_polyline: String,
}

#[async_trait]
pub trait RouteSource: Send + Sync {
    /// First plan the service ranks for `from` → `to`, if any.
    async fn best_plan(&self, from: &str, to: &str) -> Result<Option<RoutePlan>, LookupError>;
}

/// Flight Plan Database `/search/plans` client.
pub struct FlightPlanDatabaseClient {
    client: reqwest::Client,
    search_url: String,
}

impl FlightPlanDatabaseClient {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            client: build_identified_client(timeout_secs, user_agent),
            search_url: format!("{}/search/plans", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl RouteSource for FlightPlanDatabaseClient {
    async fn best_plan(&self, from: &str, to: &str) -> Result<Option<RoutePlan>, LookupError> {
        let resp = self
            .client
            .get(&self.search_url)
            .query(&[("fromICAO", from), ("toICAO", to), ("limit", "1")])
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let detail = sanitize_api_error(&body);
            return Err(LookupError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
                message: if detail.trim().is_empty() {
                    reason.to_string()
                } else {
                    format!("{reason}: {detail}")
                },
            });
        }

        let plans: Vec<RoutePlan> = resp.json().await.map_err(|e| LookupError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;
        Ok(plans.into_iter().next())
    }
}

/// Validates airport codes and asks the route source for one plan.
#[derive(Clone)]
pub struct RouteLookup {
    source: Arc<dyn RouteSource>,
}

impl RouteLookup {
    pub fn new(source: Arc<dyn RouteSource>) -> Self {
        Self { source }
    }

    pub async fn find(&self, from: &str, to: &str) -> Result<Option<RoutePlan>, LookupError> {
        let (from, to) = normalize_pair(from, to)?;
        let plan = self.source.best_plan(&from, &to).await?;
        if plan.is_none() {
            tracing::debug!(from = %from, to = %to, "No flight plans found");
        }
        Ok(plan)
    }
}

/// Trimmed, upper-cased airport codes. Both must be present.
pub fn normalize_pair(from: &str, to: &str) -> Result<(String, String), LookupError> {
    let from = from.trim();
    let to = to.trim();
    if from.is_empty() || to.is_empty() {
        return Err(LookupError::InvalidInput(
            "fromICAO and toICAO are required".into(),
        ));
    }
    Ok((from.to_ascii_uppercase(), to.to_ascii_uppercase()))
}
