use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::convert::ConvertError;
use crate::docx::DocxError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any failure producing a download: storage fetch, conversion, DOCX
    /// packaging or page rendering. The detail is logged, never returned.
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ConvertError> for AppError {
    fn from(e: ConvertError) -> Self {
        AppError::DownloadFailed(format!("conversion: {e}"))
    }
}

impl From<DocxError> for AppError {
    fn from(e: DocxError) -> Self {
        AppError::DownloadFailed(format!("docx: {e}"))
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::DownloadFailed(format!("render: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::DownloadFailed(detail) => {
                tracing::error!("Download failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOWNLOAD_FAILED",
                    "Failed to download document".to_string(),
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
