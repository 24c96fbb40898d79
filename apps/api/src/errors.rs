use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::EditError;
use crate::render::converter::ConvertError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conversion error: {0}")]
    Conversion(ConvertError),

    #[error("Conversion timed out")]
    ConversionTimeout,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ConvertError> for AppError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::Timeout(_) => AppError::ConversionTimeout,
            other => AppError::Conversion(other),
        }
    }
}

/// Runs CPU-bound work off the async executor.
pub async fn run_blocking<T, F>(task: &'static str, f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {task}: {e}")))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conversion(e) => {
                tracing::error!("Conversion error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CONVERSION_ERROR",
                    "The document could not be generated".to_string(),
                )
            }
            AppError::ConversionTimeout => {
                tracing::error!("Conversion timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "CONVERSION_TIMEOUT",
                    "The document service did not respond in time".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
