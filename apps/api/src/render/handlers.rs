//! Axum route handlers for the Resumes API (render, HTML, PDF, edit).

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{run_blocking, AppError};
use crate::models::{apply_edit, lenient, CoverageReview, ResumeDocumentModel, ResumeEdit};
use crate::render::converter::{ConversionRequest, PageSpec};
use crate::render::html::to_html;
use crate::render::renderer::render_resume;
use crate::render::styles::PageGeometry;
use crate::render::tree::{RenderTarget, RenderedDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub resume: ResumeDocumentModel,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub coverage: Option<CoverageReview>,
    #[serde(default)]
    pub target: RenderTarget,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub render_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub document: RenderedDocument,
}

#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub resume: ResumeDocumentModel,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub coverage: Option<CoverageReview>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub resume: ResumeDocumentModel,
    pub edit: ResumeEdit,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub resume: ResumeDocumentModel,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/render
pub async fn handle_render(
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let target = request.target;
    let document = render_blocking(request.resume, request.coverage, target).await?;
    let render_id = Uuid::new_v4();
    info!(
        %render_id,
        target = ?target,
        sections = document.sections.len(),
        pages = document.page_breaks.len() + 1,
        "Rendered resume"
    );

    Ok(Json(RenderResponse {
        render_id,
        generated_at: Utc::now(),
        document,
    }))
}

/// POST /api/v1/resumes/render/html
pub async fn handle_render_html(
    Json(request): Json<RenderRequest>,
) -> Result<Html<String>, AppError> {
    let html = run_blocking("html render", move || {
        let document = render_resume(&request.resume, request.coverage.as_ref(), request.target);
        to_html(&document)
    })
    .await?;
    Ok(Html(html))
}

/// POST /api/v1/resumes/render/pdf
///
/// Renders the portable target and hands the HTML to the document service.
/// Bytes are returned inline; nothing is stored.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<PdfRequest>,
) -> Result<Response, AppError> {
    let document = render_blocking(request.resume, request.coverage, RenderTarget::Portable).await?;
    let filename = pdf_filename(&document.title);
    let page = document
        .style
        .page
        .as_ref()
        .map(PageSpec::from)
        .unwrap_or_else(|| PageSpec::from(&PageGeometry::a4()));

    let conversion = ConversionRequest {
        html: to_html(&document),
        filename: filename.clone(),
        page,
    };
    let bytes = state.converter.convert(&conversion).await?;
    info!(%filename, bytes = bytes.len(), "Generated PDF");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/v1/resumes/edit
///
/// Applies one edit to the submitted model and returns the new model.
pub async fn handle_edit(Json(request): Json<EditRequest>) -> Result<Json<EditResponse>, AppError> {
    let resume = apply_edit(&request.resume, request.edit)?;
    Ok(Json(EditResponse { resume }))
}

async fn render_blocking(
    resume: ResumeDocumentModel,
    coverage: Option<CoverageReview>,
    target: RenderTarget,
) -> Result<RenderedDocument, AppError> {
    run_blocking("resume render", move || {
        render_resume(&resume, coverage.as_ref(), target)
    })
    .await
}

/// `Jane Doe Resume` → `jane-doe-resume.pdf`.
pub fn pdf_filename(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{slug}.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_filename() {
        assert_eq!(pdf_filename("Jane Doe Resume"), "jane-doe-resume.pdf");
        assert_eq!(pdf_filename("  José  O'Neil Resume"), "jos-o-neil-resume.pdf");
        assert_eq!(pdf_filename("Résumé"), "r-sum.pdf");
        assert_eq!(pdf_filename("***"), "resume.pdf");
    }
}
