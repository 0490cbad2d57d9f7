//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handlers
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Bind server to listener and drain on shutdown

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ListenerConfig;
use crate::http::demo;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::{Services, Shutdown};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub services: Services,
}

/// HTTP server for the demo API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(services: Services, config: &ListenerConfig) -> Self {
        Self {
            router: build_router(AppState { services }, config),
        }
    }

    /// Run the server until `shutdown` triggers, then drain.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, config: &ListenerConfig) -> Router {
    Router::new()
        .route("/health", get(demo::health))
        .route("/demo/networks", get(demo::get_network))
        .route("/demo/payouts", post(demo::create_payout))
        .route("/demo/transactions", get(demo::get_transaction))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
