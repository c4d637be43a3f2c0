//! Build pipelines that turn outline text into canvas objects.
//!
//! ARCHITECTURE
//! ============
//! Each pipeline receives the canvas collaborator explicitly as
//! `&dyn CanvasApi`, runs the pure `outline` algorithms, and then issues
//! canvas calls in order. Route handlers stay focused on protocol
//! translation and per-document locking.
//!
//! ERROR HANDLING
//! ==============
//! Any failure aborts the pipeline and is surfaced to the user as exactly
//! one error notification before the [`BuildError`] is returned. Objects
//! created before the failure are left in place; there is no rollback.

pub mod discovery;
pub mod export;
pub mod sitemap;

use outline::GridError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::canvas::{CanvasApi, CanvasError, FontSpec, NotifyOptions};

// Metadata keys written on built containers and frames.
pub const META_SITEMAP: &str = "sitemap";
pub const META_PAGE_DESIGNS: &str = "pageDesigns";
pub const META_SITEMAP_TEXT: &str = "sitemapText";
pub const META_CREATED_AT: &str = "createdAt";
pub const META_PAGE_COUNT: &str = "pageCount";
pub const META_FRAME_WIDTH: &str = "frameWidth";
pub const META_FRAME_HEIGHT: &str = "frameHeight";
pub const META_PAGE_INDEX: &str = "pageIndex";
pub const META_PAGE_NAME: &str = "pageName";
pub const META_PAGE_DEPTH: &str = "pageDepth";

pub const FONT_FAMILY: &str = "Inter";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no pages found in the outline")]
    EmptyInput,
    #[error("failed to load resources: {0}")]
    ResourceLoadFailure(CanvasError),
    #[error("failed to create objects: {0}")]
    ObjectCreationFailure(CanvasError),
    #[error("invalid frame size: {0}")]
    InvalidFrameSize(GridError),
}

impl From<CanvasError> for BuildError {
    fn from(err: CanvasError) -> Self {
        Self::ObjectCreationFailure(err)
    }
}

pub(crate) fn regular_font() -> FontSpec {
    FontSpec::new(FONT_FAMILY, "Regular")
}

pub(crate) fn medium_font() -> FontSpec {
    FontSpec::new(FONT_FAMILY, "Medium")
}

/// Load every font the pipelines draw with.
pub(crate) async fn preload_fonts(canvas: &dyn CanvasApi) -> Result<(), BuildError> {
    canvas
        .preload_resources(&[regular_font(), medium_font()])
        .await
        .map_err(BuildError::ResourceLoadFailure)
}

/// Current UTC time as RFC 3339, for `createdAt` tags.
pub(crate) fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Show a message to the user. Feedback is best-effort: a host that
/// rejects the notification must not change the pipeline result.
pub(crate) async fn notify(canvas: &dyn CanvasApi, message: &str, options: NotifyOptions) {
    if let Err(e) = canvas.notify_user(message, options).await {
        warn!(error = %e, message, "user notification failed");
    }
}

/// Report a failed build to the user and hand the error back.
pub(crate) async fn report_failure(canvas: &dyn CanvasApi, context: &str, err: BuildError) -> BuildError {
    notify(canvas, &format!("{context}: {err}"), NotifyOptions::error()).await;
    err
}
