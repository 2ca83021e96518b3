// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use lockstep_config::model::GatewayConfig;
use lockstep_core::LockstepError;
use lockstep_propagate::PropagationEngine;
use lockstep_relay::{RelayAuthenticator, relay_auth_middleware};
use lockstep_session::SessionAuthority;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<PropagationEngine>,
    pub sessions: Arc<SessionAuthority>,
    pub relay: Arc<RelayAuthenticator>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(
        engine: Arc<PropagationEngine>,
        sessions: Arc<SessionAuthority>,
        relay: Arc<RelayAuthenticator>,
    ) -> Self {
        Self {
            engine,
            sessions,
            relay,
            start_time: Instant::now(),
        }
    }
}

/// Build the gateway router.
///
/// - GET /health
/// - POST /api/credential
/// - GET /api/relay/validate (behind the relay token middleware)
pub fn router(state: GatewayState) -> Router {
    let relay = state.relay.clone();

    let api_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/credential", post(handlers::post_credential))
        .with_state(state);

    let relay_routes = Router::new()
        .route("/api/relay/validate", get(handlers::get_relay_validate))
        .route_layer(axum_middleware::from_fn_with_state(
            relay,
            relay_auth_middleware,
        ));

    Router::new()
        .merge(api_routes)
        .merge(relay_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured address and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), LockstepError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LockstepError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| LockstepError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
