pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/documents/:id/download",
            get(handlers::handle_download),
        )
        .route("/api/v1/documents/export", post(handlers::handle_export))
        .route("/api/v1/documents/blocks", post(handlers::handle_blocks))
        .with_state(state)
}
