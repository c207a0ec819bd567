use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::convert::{convert, Block};
use crate::documents::export::build_download;
use crate::documents::format::OutputFormat;
use crate::documents::storage::{fetch_html, get_document};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub user_id: Uuid,
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub html: String,
    pub format: String,
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlocksRequest {
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct BlocksResponse {
    pub blocks: Vec<Block>,
    /// Readable text of each block, in order.
    pub text: Vec<String>,
}

/// GET /api/v1/documents/:id/download?user_id=&format=docx|pdf
pub async fn handle_download(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let format: OutputFormat = query.format.parse()?;

    let document = get_document(&state.db, document_id, query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))?;

    let html = fetch_html(&state.s3, &state.config.s3_bucket, &document.html_key)
        .await
        .map_err(|e| AppError::DownloadFailed(format!("storage: {e:#}")))?;

    info!("Downloading {} {} as {}", document.kind, document_id, format);
    build_download(state.renderer.as_ref(), format, html, &document.title).await
}

/// POST /api/v1/documents/export
///
/// Same output paths as download, for HTML the editor holds client-side.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format: OutputFormat = request.format.parse()?;
    if request.html.trim().is_empty() {
        return Err(AppError::Validation("html cannot be empty".to_string()));
    }

    let title = request.filename.unwrap_or_default();
    build_download(
        state.renderer.as_ref(),
        format,
        Bytes::from(request.html),
        &title,
    )
    .await
}

/// POST /api/v1/documents/blocks
///
/// Returns the converter's block sequence, for previewing DOCX structure.
pub async fn handle_blocks(
    Json(request): Json<BlocksRequest>,
) -> Result<Json<BlocksResponse>, AppError> {
    let blocks = convert(&request.html).map_err(|e| AppError::Internal(e.into()))?;
    let text = blocks.iter().map(Block::plain_text).collect();
    Ok(Json(BlocksResponse { blocks, text }))
}
