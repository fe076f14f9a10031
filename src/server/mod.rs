//! HTTP completion endpoint.
//!
//! Stateless per request: the shared state is the provider handle and the
//! persona, both immutable once the server starts.

pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::llm::LlmClient;
use crate::persona::Persona;

/// Route of the completion endpoint.
pub const CHAT_DIRECT_PATH: &str = "/api/chat-direct";

/// Route of the liveness probe.
pub const HEALTH_PATH: &str = "/healthz";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream completion client.
    pub client: LlmClient,
    /// Persona prepended when the caller sends none.
    pub persona: Persona,
}

/// Builds the router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            CHAT_DIRECT_PATH,
            post(handlers::chat_direct).fallback(handlers::method_not_allowed),
        )
        .route(HEALTH_PATH, get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind_addr` and serve until Ctrl+C.
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    if !state.client.is_configured() {
        warn!("OPENAI_API_KEY is not set; every completion request will fail with 500");
    }

    let listener = TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(
        addr = %local_addr,
        model = state.client.model(),
        persona = ?state.persona,
        "chat endpoint listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("chat endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
