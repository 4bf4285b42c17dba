//! HTTP dashboard service
//!
//! An axum router over the [`SourceRegistry`] built at startup. Pages
//! return JSON view models; the `/api` routes return raw lists.
//!
//! # Example
//!
//! ```no_run
//! use trackplan::config::TrackplanConfig;
//! use trackplan::core::registry::SourceRegistry;
//! use trackplan::server::{build_router, AppState};
//!
//! # async fn example() {
//! let config = TrackplanConfig::default();
//! let sources = SourceRegistry::initialize(&config).await;
//! let app = build_router(AppState::new(sources));
//! # }
//! ```

pub mod error;
pub mod routes;
pub mod views;

use crate::config::ServerConfig;
use crate::core::registry::SourceRegistry;
use crate::domain::{Result, TrackplanError};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::RouteError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub sources: Arc<SourceRegistry>,
}

impl AppState {
    pub fn new(sources: SourceRegistry) -> Self {
        Self {
            sources: Arc::new(sources),
        }
    }
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard))
        .route("/amplitude", get(routes::amplitude_page))
        .route("/insider", get(routes::insider_page))
        .route("/gtm", get(routes::gtm_page))
        .route("/gtm/:container", get(routes::gtm_detail_page))
        .route("/api/amplitude/events", get(routes::amplitude_events))
        .route("/api/insider/events", get(routes::insider_events))
        .route("/api/gtm/:container/tags", get(routes::gtm_tags))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_address` and serves until ctrl-c or SIGTERM
pub async fn serve(bind_address: &str, sources: SourceRegistry) -> Result<()> {
    let app = build_router(AppState::new(sources));

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| TrackplanError::Connection(format!("Failed to bind {bind_address}: {e}")))?;

    tracing::info!(address = %bind_address, "Dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TrackplanError::Other(format!("Server error: {e}")))?;

    tracing::info!("Dashboard stopped");
    Ok(())
}

/// Bind address from the command line, else from configuration
pub fn resolve_bind_address(config: &ServerConfig, overridden: Option<&str>) -> String {
    overridden
        .map(str::to_string)
        .unwrap_or_else(|| config.bind_address.clone())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
