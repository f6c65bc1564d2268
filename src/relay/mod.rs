//! Relay — same-origin proxy for the trade-value feed.
//!
//! Browsers can't call the value API directly (no CORS headers upstream),
//! so the dashboard goes through this relay, which also stamps a 24-hour
//! `Cache-Control` on successful responses.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/proxy", get(routes::proxy))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the relay until Ctrl+C.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind relay port {port}"))?;
    info!(port, "Relay listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received.");
        })
        .await
        .context("Relay server error")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
