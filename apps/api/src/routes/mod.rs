pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::bullets::handlers as bullets;
use crate::coverage::handlers as coverage;
use crate::render::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Bullets API
        .route("/api/v1/bullets/normalize", post(bullets::handle_normalize))
        // Coverage API
        .route("/api/v1/coverage/matches", post(coverage::handle_matches))
        .route("/api/v1/coverage/highlight", post(coverage::handle_highlight))
        // Resumes API
        .route("/api/v1/resumes/render", post(resumes::handle_render))
        .route("/api/v1/resumes/render/html", post(resumes::handle_render_html))
        .route("/api/v1/resumes/render/pdf", post(resumes::handle_render_pdf))
        .route("/api/v1/resumes/edit", post(resumes::handle_edit))
        .with_state(state)
}
