//! Fixed-layout page rendering.
//!
//! The PDF path never touches the converter: the stored HTML is handed as-is to
//! a headless-browser rendering service. `AppState` holds an
//! `Arc<dyn PageRenderer>` so tests can swap the backend.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PAGE_FORMAT: &str = "Letter";
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Renderer error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Renderer returned an empty document")]
    Empty,

    #[error("Renderer unavailable after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError>;
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    options: PdfOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PdfOptions {
    format: &'static str,
    print_background: bool,
}

impl<'a> RenderRequest<'a> {
    fn new(html: &'a str) -> Self {
        Self {
            html,
            options: PdfOptions {
                format: PAGE_FORMAT,
                print_background: true,
            },
        }
    }
}

/// Client for a headless-browser service exposing `POST /pdf`.
#[derive(Clone)]
pub struct HeadlessRenderer {
    client: Client,
    endpoint: String,
}

impl HeadlessRenderer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RenderError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/pdf", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl PageRenderer for HeadlessRenderer {
    /// Retries on 429, 5xx and transport errors with exponential backoff.
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
        let request_body = RenderRequest::new(html);
        let mut last_error: Option<RenderError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Render attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(&request_body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(RenderError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Renderer returned {}: {}", status, body);
                last_error = Some(RenderError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(RenderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let pdf = response.bytes().await?;
            if pdf.is_empty() {
                return Err(RenderError::Empty);
            }
            debug!("Rendered {} HTML bytes into {} PDF bytes", html.len(), pdf.len());
            return Ok(pdf);
        }

        Err(last_error.unwrap_or(RenderError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }
}
