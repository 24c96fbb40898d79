//! Axum route handlers for the Coverage API.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coverage::highlighter::{highlight_coverage, RenderNode};
use crate::coverage::matcher::{find_matches, Match};
use crate::errors::{run_blocking, AppError};
use crate::models::lenient;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchesRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub covered: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub missing: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub nodes: Vec<RenderNode>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/coverage/matches
///
/// Byte offsets in the response index into the submitted `text`.
pub async fn handle_matches(
    Json(request): Json<MatchesRequest>,
) -> Result<Json<MatchesResponse>, AppError> {
    let keywords = request.keywords.len();
    let matches = run_blocking("keyword scan", move || {
        find_matches(&request.text, &request.keywords)
    })
    .await?;
    debug!(keywords, matches = matches.len(), "Keyword scan complete");
    Ok(Json(MatchesResponse { matches }))
}

/// POST /api/v1/coverage/highlight
pub async fn handle_highlight(
    Json(request): Json<HighlightRequest>,
) -> Result<Json<HighlightResponse>, AppError> {
    let nodes = run_blocking("coverage highlight", move || {
        highlight_coverage(&request.text, &request.covered, &request.missing)
    })
    .await?;
    Ok(Json(HighlightResponse { nodes }))
}
