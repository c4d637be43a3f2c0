//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each request addresses one open document. The routes map one-to-one onto
//! the actions a user can trigger: build a sitemap, export design frames,
//! count existing diagrams, and recover the last outline. Closing a document
//! frees its canvas.

pub mod documents;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/documents", post(documents::create_document))
        .route("/api/documents/{id}", get(documents::get_document).delete(documents::close_document))
        .route("/api/documents/{id}/objects", get(documents::list_objects))
        .route("/api/documents/{id}/objects/{object_id}", get(documents::get_object))
        .route("/api/documents/{id}/notifications", get(documents::list_notifications))
        .route("/api/documents/{id}/sitemaps", get(documents::existing))
        .route("/api/documents/{id}/sitemap", post(documents::build_sitemap))
        .route("/api/documents/{id}/export", post(documents::export_frames))
        .route("/api/documents/{id}/outline", get(documents::recover_outline))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
