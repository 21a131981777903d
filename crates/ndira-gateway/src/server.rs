// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The upstream callers are
//! other services on the platform (order and account flows) posting
//! fire-and-forget notifications.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use ndira_config::model::GatewayConfig;
use ndira_core::NdiraError;
use ndira_notify::Notifier;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The orchestrating notification service.
    pub notifier: Arc<Notifier>,
    /// Process start time for the status endpoint's uptime field.
    pub start_time: std::time::Instant,
}

impl GatewayState {
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self {
            notifier,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the gateway router.
///
/// Routes:
/// - GET  /api/whatsapp/status
/// - POST /api/whatsapp/send and POST /send-message (same handler)
/// - POST /api/receipt/send and POST /api/notify/send (same handler)
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/whatsapp/status", get(handlers::get_status))
        .route("/api/whatsapp/send", post(handlers::post_send_message))
        .route("/send-message", post(handlers::post_send_message))
        .route("/api/receipt/send", post(handlers::post_notify))
        .route("/api/notify/send", post(handlers::post_notify))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the gateway until the process exits.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), NdiraError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NdiraError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| NdiraError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
