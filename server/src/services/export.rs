//! Export pipeline — one blank design frame per outline page, packed into a
//! grid inside a tagged container.
//!
//! DESIGN
//! ======
//! Frames go on a page named "Page Designs", created on first export. Hosts
//! that cannot create pages keep the current one; hosts without sections
//! get a plain frame as the container. Neither fallback fails the export.
//!
//! Each frame carries its page index, name and depth as metadata so the
//! outline can be recovered even if the container's stored text is lost.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use outline::{GridLayout, GridSpec, OutlineRecord, pack_grid, parse, to_indented_text};

use super::{
    BuildError, META_CREATED_AT, META_FRAME_HEIGHT, META_FRAME_WIDTH, META_PAGE_COUNT, META_PAGE_DEPTH,
    META_PAGE_DESIGNS, META_PAGE_INDEX, META_PAGE_NAME, META_SITEMAP_TEXT, medium_font, notify, preload_fonts,
    regular_font, report_failure, timestamp,
};
use crate::canvas::{
    CanvasApi, CanvasError, EditorKind, Geometry, Handle, NotifyOptions, ObjectKind, Style, TextAlign, TextSpec,
};
use crate::config::SitemapConfig;

pub const DESIGN_PAGE_NAME: &str = "Page Designs";

const TEXT_INSET: f64 = 60.0;
const TITLE_FONT_SIZE: f64 = 32.0;
const TITLE_HEIGHT: f64 = 40.0;
const TITLE_COLOR: &str = "#1A1A1A";
const LEVEL_Y: f64 = 105.0;
const LEVEL_FONT_SIZE: f64 = 14.0;
const LEVEL_HEIGHT: f64 = 20.0;
const LEVEL_COLOR: &str = "#808080";
const FRAME_FILL: &str = "#FFFFFF";
const CONTAINER_FILL: &str = "#FAFAFF";
const CONTAINER_OPACITY: f64 = 0.5;
const WHITEBOARD_WARNING_MS: u64 = 5000;

// =============================================================================
// TYPES
// =============================================================================

/// Export request. Missing frame dimensions use the configured defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub text: String,
    #[serde(default)]
    pub frame_width: Option<f64>,
    #[serde(default)]
    pub frame_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    /// Page the frames were placed on.
    pub page: Handle,
    pub container: Handle,
    /// `Section`, or `Frame` when the host has no sections.
    pub container_kind: ObjectKind,
    pub frames: usize,
    pub frame_width: f64,
    pub frame_height: f64,
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Create one design frame per outline page.
///
/// Whiteboard hosts get a warning first, since the frames land in the
/// whiteboard file itself.
///
/// # Errors
///
/// [`BuildError::EmptyInput`] if the outline has no pages,
/// [`BuildError::InvalidFrameSize`] for a non-positive frame size,
/// [`BuildError::ResourceLoadFailure`] if fonts fail to load, and
/// [`BuildError::ObjectCreationFailure`] if any required canvas call fails.
pub async fn export_frames(
    canvas: &dyn CanvasApi,
    request: &ExportRequest,
    config: &SitemapConfig,
) -> Result<ExportReport, BuildError> {
    let editor = canvas.editor_kind().await;
    match run(canvas, request, config, editor).await {
        Ok(report) => {
            let message = match editor {
                EditorKind::Whiteboard => "Page design frames created in current file!",
                EditorKind::Design => "Page design frames created successfully!",
            };
            notify(canvas, message, NotifyOptions::info()).await;
            Ok(report)
        }
        Err(err) => Err(report_failure(canvas, "Error creating frames", err).await),
    }
}

async fn run(
    canvas: &dyn CanvasApi,
    request: &ExportRequest,
    config: &SitemapConfig,
    editor: EditorKind,
) -> Result<ExportReport, BuildError> {
    let records = parse(&request.text);
    if records.is_empty() {
        return Err(BuildError::EmptyInput);
    }
    let spec = config.grid_spec(request.frame_width, request.frame_height);
    let grid = pack_grid(records.len(), &spec).map_err(BuildError::InvalidFrameSize)?;

    if editor == EditorKind::Whiteboard {
        notify(
            canvas,
            "Export creates frames in the current whiteboard file. For best results, run it in a design file.",
            NotifyOptions::warning(WHITEBOARD_WARNING_MS),
        )
        .await;
    }

    preload_fonts(canvas).await?;

    let page = design_page(canvas).await?;
    canvas.set_current_container(page).await?;

    let (container, container_kind) = create_container(canvas).await?;
    canvas
        .set_name(
            container,
            &format!("{DESIGN_PAGE_NAME} ({} pages, {}×{})", records.len(), spec.frame_width, spec.frame_height),
        )
        .await?;
    canvas
        .set_geometry(container, Geometry::new(0.0, 0.0, grid.container_width, grid.container_height))
        .await?;
    let fill = Style {
        fill: Some(CONTAINER_FILL.to_owned()),
        opacity: Some(CONTAINER_OPACITY),
        ..Style::default()
    };
    match canvas.set_style(container, &fill).await {
        Ok(()) => {}
        Err(CanvasError::Unsupported(what)) => debug!(what, "container fill skipped"),
        Err(e) => return Err(e.into()),
    }
    tag_container(canvas, container, &records, &spec).await;

    draw_frames(canvas, container, &records, &grid, &spec).await?;

    canvas.select_and_focus(&[container]).await?;

    info!(
        frames = records.len(),
        width = spec.frame_width,
        height = spec.frame_height,
        ?container_kind,
        "page design frames exported"
    );
    Ok(ExportReport {
        page,
        container,
        container_kind,
        frames: records.len(),
        frame_width: spec.frame_width,
        frame_height: spec.frame_height,
    })
}

async fn design_page(canvas: &dyn CanvasApi) -> Result<Handle, BuildError> {
    match canvas.find_or_create_named_container(DESIGN_PAGE_NAME).await {
        Ok(page) => Ok(page),
        Err(CanvasError::Unsupported(what)) => {
            warn!(what, "cannot create design page, using current page");
            Ok(canvas.current_container().await?)
        }
        Err(e) => Err(e.into()),
    }
}

async fn create_container(canvas: &dyn CanvasApi) -> Result<(Handle, ObjectKind), BuildError> {
    match canvas.create(ObjectKind::Section).await {
        Ok(section) => Ok((section, ObjectKind::Section)),
        Err(CanvasError::Unsupported(what)) => {
            warn!(what, "sections unavailable, using a frame container");
            Ok((canvas.create(ObjectKind::Frame).await?, ObjectKind::Frame))
        }
        Err(e) => Err(e.into()),
    }
}

/// Tag the container for discovery. Tags are best-effort; the frames are
/// still useful without them.
async fn tag_container(canvas: &dyn CanvasApi, container: Handle, records: &[OutlineRecord], spec: &GridSpec) {
    let tags = [
        (META_PAGE_DESIGNS, "true".to_owned()),
        (META_SITEMAP_TEXT, to_indented_text(records)),
        (META_CREATED_AT, timestamp()),
        (META_PAGE_COUNT, records.len().to_string()),
        (META_FRAME_WIDTH, spec.frame_width.to_string()),
        (META_FRAME_HEIGHT, spec.frame_height.to_string()),
    ];
    for (key, value) in tags {
        if let Err(e) = canvas.set_metadata(container, key, &value).await {
            warn!(error = %e, key, "failed to tag page design container");
        }
    }
}

async fn draw_frames(
    canvas: &dyn CanvasApi,
    container: Handle,
    records: &[OutlineRecord],
    grid: &GridLayout,
    spec: &GridSpec,
) -> Result<(), BuildError> {
    let text_width = (spec.frame_width - 2.0 * TEXT_INSET).max(0.0);

    for (index, (record, slot)) in records.iter().zip(&grid.slots).enumerate() {
        let frame = canvas.create(ObjectKind::Frame).await?;
        canvas.set_name(frame, &record.name).await?;
        canvas
            .set_geometry(
                frame,
                Geometry::new(slot.x + spec.padding, slot.y + spec.padding, spec.frame_width, spec.frame_height),
            )
            .await?;
        canvas
            .set_style(frame, &Style { fill: Some(FRAME_FILL.to_owned()), ..Style::default() })
            .await?;
        canvas
            .set_metadata(frame, META_PAGE_DEPTH, &record.depth.to_string())
            .await?;
        canvas
            .set_metadata(frame, META_PAGE_INDEX, &index.to_string())
            .await?;
        canvas.set_metadata(frame, META_PAGE_NAME, &record.name).await?;

        let title = canvas.create(ObjectKind::Text).await?;
        let title_text = TextSpec {
            content: record.name.clone(),
            font: medium_font(),
            font_size: TITLE_FONT_SIZE,
            align: TextAlign::Left,
            color: Some(TITLE_COLOR.to_owned()),
        };
        canvas.set_text(title, &title_text).await?;
        canvas
            .set_geometry(title, Geometry::new(TEXT_INSET, TEXT_INSET, text_width, TITLE_HEIGHT))
            .await?;
        let mut contents = vec![title];

        if record.depth > 0 {
            let level = canvas.create(ObjectKind::Text).await?;
            let level_text = TextSpec {
                content: format!("Level {}", record.depth),
                font: regular_font(),
                font_size: LEVEL_FONT_SIZE,
                align: TextAlign::Left,
                color: Some(LEVEL_COLOR.to_owned()),
            };
            canvas.set_text(level, &level_text).await?;
            canvas
                .set_geometry(level, Geometry::new(TEXT_INSET, LEVEL_Y, text_width, LEVEL_HEIGHT))
                .await?;
            contents.push(level);
        }

        canvas.group_into(frame, &contents).await?;
        canvas.group_into(container, &[frame]).await?;
        debug!(index, name = %record.name, "design frame created");
    }
    Ok(())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
