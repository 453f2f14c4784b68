//! HTTP server assembly

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};

/// The HTTP server: router assembly plus the accept loop
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Build the application router
    pub fn build_router(state: ServerState) -> Router {
        api::router(state).layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until the task is cancelled
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("HTTP server listening on {addr}");

        axum::serve(listener, Self::build_router(self.state)).await?;
        Ok(())
    }
}
