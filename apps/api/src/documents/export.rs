use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::info;

use crate::convert::convert_bytes;
use crate::docx::write_docx;
use crate::documents::format::{content_disposition, OutputFormat};
use crate::errors::AppError;
use crate::render::PageRenderer;

/// Produces the downloadable byte stream for `html` in the requested format.
///
/// DOCX: convert + package on a blocking thread (the parsed DOM is `Rc`-based
/// and CPU-bound). PDF: the raw HTML goes straight to the renderer.
pub async fn build_download(
    renderer: &dyn PageRenderer,
    format: OutputFormat,
    html: Bytes,
    title: &str,
) -> Result<Response, AppError> {
    let body = match format {
        OutputFormat::Docx => {
            let docx = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
                let blocks = convert_bytes(&html)?;
                Ok(write_docx(&blocks)?)
            })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX task failed: {e}")))??;
            Bytes::from(docx)
        }
        OutputFormat::Pdf => renderer.render_pdf(&String::from_utf8_lossy(&html)).await?,
    };

    info!("Built {} download ({} bytes)", format, body.len());

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(title, format)),
    ];
    Ok((headers, body).into_response())
}
