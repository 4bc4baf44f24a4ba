use reqwest::Client;
use std::time::Duration;

/// Shared builder for every upstream HTTP client (generation, embedding,
/// vector index, geocoder, weather, route).
pub fn build_provider_client_with_timeout(timeout_secs: u64) -> Client {
    client_builder(timeout_secs)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client that identifies itself with `user_agent` on every request.
pub fn build_identified_client(timeout_secs: u64, user_agent: &str) -> Client {
    client_builder(timeout_secs)
        .user_agent(user_agent.to_string())
        .build()
        .unwrap_or_else(|_| Client::new())
}

fn client_builder(timeout_secs: u64) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
}
