//! Mock OpenEmote API server.
//!
//! Serves a fixed set of JSON fixtures for local testing of the OpenEmote
//! client:
//! - Health endpoints
//! - Global emote endpoints
//! - Channel emote endpoints (any channel receives the same fixture)
//! - A catch-all JSON 404
//!
//! Fixtures are built once at startup and shared read-only; per-request
//! logging is deliberately suppressed so test runs stay quiet.

pub mod api;

use std::sync::Arc;

use axum::Router;
use tracing::info;

use emotekit_core::config::MockConfig;
use emotekit_core::fixtures::EmoteSet;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub global_emotes: EmoteSet,
    pub channel_emotes: EmoteSet,
}

/// The mock server.
pub struct MockServer {
    config: MockConfig,
    state: Arc<AppState>,
}

impl MockServer {
    /// Create a new mock server with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        let state = Arc::new(AppState {
            global_emotes: EmoteSet::global(),
            channel_emotes: EmoteSet::channel(),
        });
        Self { config, state }
    }

    /// Build the router. Exposed so tests can serve it on an ephemeral port.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(api::health::routes())
            .merge(api::emotes::routes())
            .fallback(api::not_found)
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve forever.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = self.config.listen_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %listener.local_addr()?, "openemote-mock listening");

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
