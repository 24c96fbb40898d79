//! Axum route handlers for the Bullets API.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bullets::normalizer::normalize_bullets;
use crate::models::TextOrList;

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub input: TextOrList,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub bullets: Vec<String>,
}

/// POST /api/v1/bullets/normalize
///
/// Accepts a string or a list of strings; malformed input normalizes to no bullets.
pub async fn handle_normalize(Json(request): Json<NormalizeRequest>) -> Json<NormalizeResponse> {
    let bullets = normalize_bullets(request.input.as_input());
    debug!(count = bullets.len(), "Normalized bullets");
    Json(NormalizeResponse { bullets })
}
