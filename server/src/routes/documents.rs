//! Document routes — open a canvas, run the pipelines against it, and
//! inspect the result.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::canvas::Handle;
use crate::canvas::memory::{Capabilities, CanvasObject, Faults, Notification};
use crate::services::discovery;
use crate::services::export::{self, ExportReport, ExportRequest};
use crate::services::sitemap::{self, BuildReport, BuildRequest};
use crate::services::BuildError;
use crate::state::{AppState, Document};

/// Error body returned alongside a failure status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Body of `POST /api/documents`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateDocumentBody {
    #[serde(flatten)]
    pub capabilities: Capabilities,
    /// Injected host failures, for exercising error paths.
    pub faults: Faults,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub capabilities: Capabilities,
    pub faults: Faults,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub capabilities: Capabilities,
    pub pages: Vec<String>,
    pub objects: usize,
    pub selection: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ExistingResponse {
    pub sitemaps: usize,
    pub page_designs: usize,
}

#[derive(Debug, Serialize)]
pub struct OutlineResponse {
    pub text: Option<String>,
}

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (status, Json(ErrorResponse { error: error.to_string() }))
}

pub(crate) fn build_error_to_status(err: &BuildError) -> StatusCode {
    match err {
        BuildError::EmptyInput | BuildError::InvalidFrameSize(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BuildError::ResourceLoadFailure(_) | BuildError::ObjectCreationFailure(_) => StatusCode::BAD_GATEWAY,
    }
}

fn build_error(err: BuildError) -> ApiError {
    api_error(build_error_to_status(&err), err)
}

async fn find_document(state: &AppState, id: Uuid) -> Result<std::sync::Arc<Document>, ApiError> {
    state
        .document(id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("document not found: {id}")))
}

/// `POST /api/documents` — open an empty document with the given host
/// capabilities.
pub async fn create_document(
    State(state): State<AppState>,
    Json(body): Json<CreateDocumentBody>,
) -> (StatusCode, Json<DocumentResponse>) {
    let CreateDocumentBody { capabilities, faults } = body;
    let id = state.open_document(capabilities, faults).await;
    tracing::info!(%id, ?capabilities, ?faults, "document opened");
    (StatusCode::CREATED, Json(DocumentResponse { id, capabilities, faults }))
}

/// `GET /api/documents/:id` — pages, object count and current selection.
pub async fn get_document(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<DocumentSummary>, ApiError> {
    let doc = find_document(&state, id).await?;
    let pages = doc.canvas.pages().await.into_iter().map(|p| p.name).collect();
    Ok(Json(DocumentSummary {
        id,
        capabilities: doc.canvas.capabilities(),
        pages,
        objects: doc.canvas.object_count().await,
        selection: doc.canvas.selection().await,
    }))
}

/// `DELETE /api/documents/:id` — close a document once any running build
/// has finished.
pub async fn close_document(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if state.close_document(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(StatusCode::NOT_FOUND, format!("document not found: {id}")))
    }
}

/// `GET /api/documents/:id/objects` — every non-page object, in creation order.
pub async fn list_objects(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CanvasObject>>, ApiError> {
    let doc = find_document(&state, id).await?;
    Ok(Json(doc.canvas.objects().await))
}

/// `GET /api/documents/:id/objects/:object_id` — one object, pages included.
pub async fn get_object(
    State(state): State<AppState>,
    Path((id, object_id)): Path<(Uuid, Handle)>,
) -> Result<Json<CanvasObject>, ApiError> {
    let doc = find_document(&state, id).await?;
    doc.canvas
        .object(object_id)
        .await
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("object not found: {object_id}")))
}

/// `GET /api/documents/:id/notifications` — messages shown to the user.
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let doc = find_document(&state, id).await?;
    Ok(Json(doc.canvas.notifications().await))
}

/// `GET /api/documents/:id/sitemaps` — count previously built diagrams.
pub async fn existing(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ExistingResponse>, ApiError> {
    let doc = find_document(&state, id).await?;
    let sitemaps = discovery::existing_sitemaps(&doc.canvas)
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e))?;
    let page_designs = discovery::existing_page_designs(&doc.canvas)
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e))?;
    Ok(Json(ExistingResponse { sitemaps: sitemaps.len(), page_designs: page_designs.len() }))
}

/// `POST /api/documents/:id/sitemap` — build a sitemap diagram.
pub async fn build_sitemap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BuildRequest>,
) -> Result<(StatusCode, Json<BuildReport>), ApiError> {
    let doc = find_document(&state, id).await?;
    let _build = doc.build_lock.lock().await;
    let report = sitemap::build_sitemap(&doc.canvas, &body, &state.config)
        .await
        .map_err(|e| {
            warn!(%id, error = %e, "sitemap build failed");
            build_error(e)
        })?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// `POST /api/documents/:id/export` — create one design frame per page.
pub async fn export_frames(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ExportRequest>,
) -> Result<(StatusCode, Json<ExportReport>), ApiError> {
    let doc = find_document(&state, id).await?;
    let _build = doc.build_lock.lock().await;
    let report = export::export_frames(&doc.canvas, &body, &state.config)
        .await
        .map_err(|e| {
            warn!(%id, error = %e, "page design export failed");
            build_error(e)
        })?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// `GET /api/documents/:id/outline` — outline text of the latest diagram.
pub async fn recover_outline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OutlineResponse>, ApiError> {
    let doc = find_document(&state, id).await?;
    let text = discovery::recover_outline(&doc.canvas)
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e))?;
    Ok(Json(OutlineResponse { text }))
}

#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;
