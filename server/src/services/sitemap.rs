//! Sitemap pipeline — outline text to a connected diagram of page nodes.
//!
//! DESIGN
//! ======
//! Every record becomes a transparent frame holding a rounded rectangle and
//! a centered label. Connectors run from the parent rectangle's bottom edge
//! to the child rectangle's top edge. Frames and connectors are grouped
//! under one root group, which is tagged last so discovery never finds a
//! half-built diagram.
//!
//! Fonts are loaded before `update`/`delete-all` removes anything, so a
//! resource failure leaves the previous diagram intact.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use outline::{Edge, OutlineRecord, Position, derive_edges, layout_records, parse, to_indented_text};

use super::{
    BuildError, META_CREATED_AT, META_PAGE_COUNT, META_SITEMAP, META_SITEMAP_TEXT, discovery, notify, preload_fonts,
    regular_font, report_failure, timestamp,
};
use crate::canvas::{
    Anchor, CanvasApi, Geometry, Handle, NotifyOptions, ObjectKind, Style, TextAlign, TextSpec,
};
use crate::config::SitemapConfig;

pub const ROOT_GROUP_NAME: &str = "Sitemap";

const NODE_WIDTH: f64 = 200.0;
const NODE_HEIGHT: f64 = 100.0;
const LABEL_X: f64 = 10.0;
const LABEL_Y: f64 = 25.0;
const LABEL_WIDTH: f64 = 180.0;
const LABEL_HEIGHT: f64 = 50.0;
const LABEL_FONT_SIZE: f64 = 16.0;
const CORNER_RADIUS: f64 = 8.0;
const STROKE_WIDTH: f64 = 2.0;

const ROOT_FILL: &str = "#FFE699";
const CHILD_FILL: &str = "#CCF2FF";
const NODE_STROKE: &str = "#B3B3B3";

// =============================================================================
// TYPES
// =============================================================================

/// What happens to previously built sitemaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMode {
    /// Build alongside anything already there.
    #[default]
    Create,
    /// Replace the most recently built sitemap.
    Update,
    /// Remove every existing sitemap first.
    DeleteAll,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildRequest {
    pub text: String,
    #[serde(default)]
    pub mode: BuildMode,
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub root: Handle,
    pub nodes: usize,
    pub connectors: usize,
    /// Previously built sitemaps removed by the mode.
    pub removed: usize,
}

/// Handles for one drawn page node.
#[derive(Debug, Clone, Copy)]
struct NodeShape {
    frame: Handle,
    rect: Handle,
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Build a sitemap diagram from indented outline text.
///
/// The user sees one notification either way: a success message naming the
/// mode, or the error that aborted the build.
///
/// # Errors
///
/// [`BuildError::EmptyInput`] if the outline has no pages,
/// [`BuildError::ResourceLoadFailure`] if fonts fail to load, and
/// [`BuildError::ObjectCreationFailure`] if any canvas call fails midway.
pub async fn build_sitemap(
    canvas: &dyn CanvasApi,
    request: &BuildRequest,
    config: &SitemapConfig,
) -> Result<BuildReport, BuildError> {
    match run(canvas, request, config).await {
        Ok(report) => {
            let message = match request.mode {
                BuildMode::Update => "Sitemap updated successfully!",
                BuildMode::Create | BuildMode::DeleteAll => "Sitemap created successfully!",
            };
            notify(canvas, message, NotifyOptions::info()).await;
            Ok(report)
        }
        Err(err) => Err(report_failure(canvas, "Error creating sitemap", err).await),
    }
}

async fn run(canvas: &dyn CanvasApi, request: &BuildRequest, config: &SitemapConfig) -> Result<BuildReport, BuildError> {
    let records = parse(&request.text);
    if records.is_empty() {
        return Err(BuildError::EmptyInput);
    }

    preload_fonts(canvas).await?;

    let removed = match request.mode {
        BuildMode::Create => 0,
        BuildMode::Update => usize::from(discovery::remove_latest_sitemap(canvas).await?),
        BuildMode::DeleteAll => discovery::remove_all_sitemaps(canvas).await?,
    };

    let positions = layout_records(&records, config.spacing);
    let edges = derive_edges(&records);

    let mut shapes = Vec::with_capacity(records.len());
    for (index, (record, position)) in records.iter().zip(&positions).enumerate() {
        shapes.push(draw_node(canvas, record, *position).await?);
        debug!(index, name = %record.name, "sitemap node created");
    }

    let mut elements: Vec<Handle> = shapes.iter().map(|s| s.frame).collect();
    for edge in &edges {
        elements.push(draw_connector(canvas, &shapes, *edge).await?);
    }

    let root = canvas.create(ObjectKind::Group).await?;
    canvas.set_name(root, ROOT_GROUP_NAME).await?;
    canvas.group_into(root, &elements).await?;
    tag_root(canvas, root, &records).await?;

    canvas.select_and_focus(&elements).await?;

    info!(nodes = records.len(), connectors = edges.len(), removed, mode = ?request.mode, "sitemap built");
    Ok(BuildReport { root, nodes: records.len(), connectors: edges.len(), removed })
}

async fn draw_node(canvas: &dyn CanvasApi, record: &OutlineRecord, position: Position) -> Result<NodeShape, BuildError> {
    let rect = canvas.create(ObjectKind::Rectangle).await?;
    canvas
        .set_geometry(rect, Geometry::new(0.0, 0.0, NODE_WIDTH, NODE_HEIGHT))
        .await?;
    let fill = if record.depth == 0 { ROOT_FILL } else { CHILD_FILL };
    let style = Style {
        fill: Some(fill.to_owned()),
        stroke: Some(NODE_STROKE.to_owned()),
        stroke_width: Some(STROKE_WIDTH),
        corner_radius: Some(CORNER_RADIUS),
        opacity: None,
    };
    canvas.set_style(rect, &style).await?;

    let label = canvas.create(ObjectKind::Text).await?;
    let text = TextSpec {
        content: record.name.clone(),
        font: regular_font(),
        font_size: LABEL_FONT_SIZE,
        align: TextAlign::Center,
        color: None,
    };
    canvas.set_text(label, &text).await?;
    canvas
        .set_geometry(label, Geometry::new(LABEL_X, LABEL_Y, LABEL_WIDTH, LABEL_HEIGHT))
        .await?;

    let frame = canvas.create(ObjectKind::Frame).await?;
    canvas.set_name(frame, &record.name).await?;
    canvas
        .set_geometry(frame, Geometry::new(position.x, position.y, NODE_WIDTH, NODE_HEIGHT))
        .await?;
    canvas
        .set_style(frame, &Style { fill: Some(String::new()), ..Style::default() })
        .await?;
    canvas.group_into(frame, &[rect, label]).await?;

    Ok(NodeShape { frame, rect })
}

async fn draw_connector(canvas: &dyn CanvasApi, shapes: &[NodeShape], edge: Edge) -> Result<Handle, BuildError> {
    let connector = canvas.create(ObjectKind::Connector).await?;
    canvas
        .connect(
            connector,
            shapes[edge.parent_index].rect,
            Anchor::Bottom,
            shapes[edge.child_index].rect,
            Anchor::Top,
        )
        .await?;
    Ok(connector)
}

async fn tag_root(canvas: &dyn CanvasApi, root: Handle, records: &[OutlineRecord]) -> Result<(), BuildError> {
    canvas
        .set_metadata(root, META_SITEMAP_TEXT, &to_indented_text(records))
        .await?;
    canvas.set_metadata(root, META_CREATED_AT, &timestamp()).await?;
    canvas
        .set_metadata(root, META_PAGE_COUNT, &records.len().to_string())
        .await?;
    // Discovery keys on this tag, so it goes on last.
    canvas.set_metadata(root, META_SITEMAP, "true").await?;
    Ok(())
}

#[cfg(test)]
#[path = "sitemap_test.rs"]
mod tests;
