//! Mock API endpoint modules.

pub mod emotes;
pub mod health;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Error body returned for every unmatched route.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: &'static str,
}

/// Catch-all handler: structured JSON 404 instead of an empty body.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            ok: false,
            error: "not_found",
        }),
    )
}
