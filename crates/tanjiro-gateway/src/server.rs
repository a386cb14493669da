// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tanjiro_agent::TurnRouter;
use tanjiro_config::model::GatewayConfig;
use tanjiro_core::TanjiroError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::sessions::SessionStore;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Routes every user turn.
    pub router: Arc<TurnRouter>,
    /// Live sessions.
    pub sessions: Arc<SessionStore>,
    /// Process start time for uptime calculation.
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(router: Arc<TurnRouter>, sessions: Arc<SessionStore>) -> Self {
        Self {
            router,
            sessions,
            started_at: Instant::now(),
        }
    }
}

/// Builds the application router with all routes and middleware.
pub fn app(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/v1/sessions", post(handlers::create_session))
        .route("/v1/messages", post(handlers::post_message))
        .route("/v1/sessions/{id}", delete(handlers::delete_session))
        .route("/v1/sessions/{id}/history", get(handlers::get_history))
        .route("/v1/sessions/{id}/memes/next", post(handlers::next_meme))
        .route("/v1/sessions/{id}/memes/previous", post(handlers::previous_meme))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds to the configured host:port and serves until Ctrl-C.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), TanjiroError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TanjiroError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway listening on http://{addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TanjiroError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanjiro_agent::RouterSettings;
    use tanjiro_test_utils::{MockMemeSource, MockProvider};

    #[test]
    fn gateway_state_is_clone() {
        let router = TurnRouter::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockMemeSource::new()),
            "persona".to_string(),
            RouterSettings::default(),
        );
        let state = GatewayState::new(Arc::new(router), Arc::new(SessionStore::new(1, 1)));
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.sessions, &cloned.sessions));
    }

    #[tokio::test]
    async fn bind_failure_is_gateway_error() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let router = TurnRouter::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockMemeSource::new()),
            "persona".to_string(),
            RouterSettings::default(),
        );
        let state = GatewayState::new(Arc::new(router), Arc::new(SessionStore::new(1, 1)));
        let config = GatewayConfig {
            host: "127.0.0.1".to_string(),
            port,
        };

        let err = start_server(&config, state).await.unwrap_err();
        assert!(matches!(err, TanjiroError::Gateway { .. }));
        assert!(err.to_string().contains("failed to bind"));
    }
}
