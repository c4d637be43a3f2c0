//! Canvas collaborator — the capability surface the pipelines draw through.
//!
//! DESIGN
//! ======
//! The build and export pipelines never touch a host document directly. They
//! receive a `&dyn CanvasApi` and call its primitives to create objects, style
//! them, wire connectors, tag containers with metadata, and give the user
//! feedback. Any host (a live whiteboard, the in-memory scene in
//! [`memory`]) implements this trait.
//!
//! Every call is fallible and async. Optional capabilities report
//! [`CanvasError::Unsupported`]; callers decide the fallback.

pub mod memory;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::MemoryCanvas;

/// Opaque handle to a canvas object.
pub type Handle = Uuid;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("object not found: {0}")]
    NotFound(Handle),
    #[error("unsupported capability: {0}")]
    Unsupported(&'static str),
    #[error("resource load failed: {0}")]
    ResourceLoad(String),
    #[error("operation rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Kinds of object a collaborator can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Rectangle,
    Text,
    Connector,
    Frame,
    Group,
    Section,
    Page,
}

/// Attachment point on an object's bounding box for connector endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// Position and size, relative to the object's parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Visual style. Absent fields are left at the host default; an empty
/// `fill` string clears the fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A font family + style pair that must be loaded before text uses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub style: String,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: &str, style: &str) -> Self {
        Self { family: family.to_owned(), style: style.to_owned() }
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text content and typography for a text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    pub content: String,
    pub font: FontSpec,
    pub font_size: f64,
    pub align: TextAlign,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// =============================================================================
// HOST FEEDBACK
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// How a user notification is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyOptions {
    pub severity: Severity,
    /// Display time; `None` uses the host default.
    pub timeout_ms: Option<u64>,
}

impl NotifyOptions {
    #[must_use]
    pub fn info() -> Self {
        Self { severity: Severity::Info, timeout_ms: None }
    }

    #[must_use]
    pub fn warning(timeout_ms: u64) -> Self {
        Self { severity: Severity::Warning, timeout_ms: Some(timeout_ms) }
    }

    #[must_use]
    pub fn error() -> Self {
        Self { severity: Severity::Error, timeout_ms: None }
    }
}

/// Which editor the host document belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    /// Collaborative whiteboard. Design frames still work but land in this file.
    #[default]
    Whiteboard,
    /// Design file with native pages.
    Design,
}

// =============================================================================
// COLLABORATOR
// =============================================================================

/// Capability set a host document provides to the pipelines.
#[async_trait::async_trait]
pub trait CanvasApi: Send + Sync {
    /// Create an object of `kind` in the current container.
    async fn create(&self, kind: ObjectKind) -> Result<Handle, CanvasError>;

    async fn set_name(&self, handle: Handle, name: &str) -> Result<(), CanvasError>;

    async fn set_geometry(&self, handle: Handle, geometry: Geometry) -> Result<(), CanvasError>;

    async fn set_style(&self, handle: Handle, style: &Style) -> Result<(), CanvasError>;

    /// Set text content. The font must already be loaded via
    /// [`CanvasApi::preload_resources`].
    async fn set_text(&self, handle: Handle, text: &TextSpec) -> Result<(), CanvasError>;

    /// Attach both ends of an existing connector object.
    async fn connect(
        &self,
        connector: Handle,
        from: Handle,
        from_anchor: Anchor,
        to: Handle,
        to_anchor: Anchor,
    ) -> Result<(), CanvasError>;

    /// Move `children` under `parent`, in order.
    async fn group_into(&self, parent: Handle, children: &[Handle]) -> Result<(), CanvasError>;

    async fn preload_resources(&self, fonts: &[FontSpec]) -> Result<(), CanvasError>;

    /// Find a page by name, creating it if missing. Hosts without page
    /// creation return [`CanvasError::Unsupported`].
    async fn find_or_create_named_container(&self, name: &str) -> Result<Handle, CanvasError>;

    async fn current_container(&self) -> Result<Handle, CanvasError>;

    async fn set_current_container(&self, handle: Handle) -> Result<(), CanvasError>;

    async fn set_metadata(&self, handle: Handle, key: &str, value: &str) -> Result<(), CanvasError>;

    async fn get_metadata(&self, handle: Handle, key: &str) -> Result<Option<String>, CanvasError>;

    /// Every object whose metadata `key` equals `value`, oldest first.
    async fn find_tagged(&self, key: &str, value: &str) -> Result<Vec<Handle>, CanvasError>;

    /// Direct children of `handle`, oldest first.
    async fn children(&self, handle: Handle) -> Result<Vec<Handle>, CanvasError>;

    /// Remove an object and everything beneath it.
    async fn remove(&self, handle: Handle) -> Result<(), CanvasError>;

    async fn select_and_focus(&self, handles: &[Handle]) -> Result<(), CanvasError>;

    async fn notify_user(&self, message: &str, options: NotifyOptions) -> Result<(), CanvasError>;

    async fn editor_kind(&self) -> EditorKind;
}
