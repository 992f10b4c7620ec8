//! Emote fixture endpoints.
//!
//! Both the versioned (`/v1/...`) and unversioned (`/api/...`) path forms
//! the client has used are served. The channel routes take a wildcard so
//! any channel id (including ones with slashes) maps to the same fixture.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use emotekit_core::fixtures::EmoteSet;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/emotes/global", get(global_emotes))
        .route("/api/emotes/global", get(global_emotes))
        .route("/v1/emotes/twitch/*channel", get(channel_emotes))
        .route("/api/emotes/channel/*channel", get(channel_emotes))
}

async fn global_emotes(State(state): State<Arc<AppState>>) -> Json<EmoteSet> {
    Json(state.global_emotes.clone())
}

async fn channel_emotes(State(state): State<Arc<AppState>>) -> Json<EmoteSet> {
    Json(state.channel_emotes.clone())
}
