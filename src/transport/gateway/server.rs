use super::chat::handle_chat;
use super::handlers::{handle_health, handle_metar, handle_plan};
use super::{AppState, MAX_BODY_SIZE, REQUEST_TIMEOUT_SECS};

use crate::app::Services;
use crate::config::{Config, GatewayConfig};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be reachable from other machines.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let listener = bind_listener(host, port).await?;

    run_gateway_with_listener(host, listener, config).await
}

/// Resolves hostnames such as `localhost` and bracketed IPv6 literals.
async fn bind_listener(host: &str, port: u16) -> Result<tokio::net::TcpListener> {
    let bind_host = host.trim_start_matches('[').trim_end_matches(']');
    tokio::net::TcpListener::bind((bind_host, port))
        .await
        .with_context(|| format!("bind gateway socket on {host}:{port}"))
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = AppState::from(Services::from_config(&config).context("build gateway services")?);
    let app = build_app(state, &config.gateway);

    print_gateway_banner(&display_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Could not listen for Ctrl-C; gateway runs until killed");
        std::future::pending::<()>().await;
    }
}

fn print_gateway_banner(display_addr: &str) {
    println!("Gateway listening on {display_addr}");
    println!("  POST /api/chat   -> text/event-stream");
    println!("  GET  /api/metar?q=<station or place>");
    println!("  GET  /api/plan?fromICAO=<a>&toICAO=<b>[&decode=true]");
    println!("  GET  /health");
}

/// Request timeout for the whole router. Streaming bodies are not cut off;
/// the timer only covers the time to the response head.
fn request_timeout(gateway: &GatewayConfig) -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS.max(gateway.turn_timeout_secs.saturating_add(5)))
}

pub fn build_app(state: AppState, gateway: &GatewayConfig) -> Router {
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .route("/api/metar", get(handle_metar))
        .route("/api/plan", get(handle_plan));

    let mut app = app
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout(gateway),
        ));

    if !gateway.cors_origins.is_empty() {
        let origins: Vec<_> = gateway
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        );
    }

    app
}
