//! Axum-based HTTP gateway with body limits and request timeouts.
//!
//! Routes:
//! - `POST /api/chat` streams an answer as server-sent events
//! - `GET /api/metar?q=` returns a raw METAR
//! - `GET /api/plan?fromICAO=&toICAO=` returns an encoded route polyline
//! - `GET /health`

mod chat;
mod handlers;
mod server;

pub use server::{build_app, run_gateway, run_gateway_with_listener};

use crate::app::Services;
use crate::core::chat::ChatOrchestrator;
use crate::core::lookups::{RouteLookup, WeatherLookup};
use std::sync::Arc;

/// Maximum request body size (64KB) -- prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Minimum request timeout; raised to cover the turn deadline when needed.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatOrchestrator>,
    pub weather: WeatherLookup,
    pub routes: RouteLookup,
}

impl From<Services> for AppState {
    fn from(services: Services) -> Self {
        Self {
            chat: services.chat,
            weather: services.weather,
            routes: services.routes,
        }
    }
}
