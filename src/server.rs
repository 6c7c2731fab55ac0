//! HTTP server wiring: shared state, router, and serve loop.

use crate::config::{ServerConfig, Timing};
use crate::gateway::ws_handler;
use crate::matchmaker::Matchmaker;
use crate::questions::QuestionBank;
use crate::registry::ConnectionRegistry;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tracing::info;

/// Shared state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Process-wide matchmaker.
    pub matchmaker: Matchmaker,
    /// Live-connection registry for outbound delivery.
    pub registry: ConnectionRegistry,
}

impl AppState {
    /// Builds the shared state from a validated bank and timing config.
    pub fn new(bank: QuestionBank, timing: Timing) -> Self {
        let registry = ConnectionRegistry::new();
        let matchmaker = Matchmaker::new(registry.clone(), Arc::new(bank), timing);
        Self {
            matchmaker,
            registry,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health, liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Loads the question bank, binds the listener, and serves until shutdown.
///
/// # Errors
///
/// Fails fast on an invalid timing configuration, an empty or malformed
/// question bank, or a bind failure.
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.timing().validate()?;
    let bank = QuestionBank::from_file(config.bank())?;
    let state = AppState::new(bank, *config.timing());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());
    info!("Clients connect via ws://{}:{}/ws", config.host(), config.port());
    axum::serve(listener, app).await?;

    Ok(())
}
