//! Server creation and management utilities

use axum::{routing::get, Router};
use common::config::Config;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        // Google OAuth
        .route("/api/auth/google", get(routes::auth::google_auth_url))
        .route("/api/auth/google/callback", get(routes::auth::google_callback))
        // Calendar gateway
        .route(
            "/api/calendar/events",
            get(routes::calendar::list_events).post(routes::calendar::create_event),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and block until Ctrl+C
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    if config.google.client_id.is_none() || config.google.redirect_uri.is_none() {
        tracing::warn!("Google OAuth client is not fully configured; auth endpoints will fail");
    }

    let app = create_router(AppState::new(config));

    tracing::info!("Server running on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received shutdown signal");
        })
        .await?;

    Ok(())
}
