//! In-memory canvas — a complete [`CanvasApi`] host backed by a scene graph.
//!
//! DESIGN
//! ======
//! Objects live in a `HashMap<Handle, CanvasObject>` behind a tokio `RwLock`,
//! each with a parent link and a monotonically increasing `z_index` that
//! doubles as creation order. New objects land in the current page. Host
//! capabilities (page creation, sections, editor kind) are configurable so
//! the pipelines' fallbacks can be exercised, and [`Faults`] injects preload
//! or creation failures.
//!
//! Text requires its font to have been preloaded, as on a live host.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Anchor, CanvasApi, CanvasError, EditorKind, FontSpec, Geometry, Handle, NotifyOptions, ObjectKind, Severity,
    Style, TextSpec,
};

const DEFAULT_PAGE_NAME: &str = "Page 1";

// =============================================================================
// TYPES
// =============================================================================

/// Optional host capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Host can create new pages.
    pub pages: bool,
    /// Host can create section containers.
    pub sections: bool,
    pub editor: EditorKind,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { pages: true, sections: true, editor: EditorKind::Whiteboard }
    }
}

/// Injected failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faults {
    /// Reject every `preload_resources` call.
    pub preload: bool,
    /// Reject object creation once this many objects have been created.
    pub create_limit: Option<usize>,
}

/// Both ends of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectorEnds {
    pub from: Handle,
    pub from_anchor: Anchor,
    pub to: Handle,
    pub to_anchor: Anchor,
}

/// A scene-graph node.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasObject {
    pub id: Handle,
    pub kind: ObjectKind,
    pub name: String,
    pub parent: Option<Handle>,
    pub z_index: u64,
    pub geometry: Geometry,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<ConnectorEnds>,
    pub metadata: BTreeMap<String, String>,
}

/// A notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub timeout_ms: Option<u64>,
}

struct Scene {
    objects: HashMap<Handle, CanvasObject>,
    next_z: u64,
    created: usize,
    current_page: Handle,
    selection: Vec<Handle>,
    fonts: HashSet<FontSpec>,
    notifications: Vec<Notification>,
}

impl Scene {
    fn insert(&mut self, kind: ObjectKind, parent: Option<Handle>, name: &str) -> Handle {
        let id = Uuid::new_v4();
        let obj = CanvasObject {
            id,
            kind,
            name: name.to_owned(),
            parent,
            z_index: self.next_z,
            geometry: Geometry::default(),
            style: Style::default(),
            text: None,
            connector: None,
            metadata: BTreeMap::new(),
        };
        self.next_z += 1;
        self.objects.insert(id, obj);
        id
    }

    fn get_mut(&mut self, handle: Handle) -> Result<&mut CanvasObject, CanvasError> {
        self.objects
            .get_mut(&handle)
            .ok_or(CanvasError::NotFound(handle))
    }

    fn ensure(&self, handle: Handle) -> Result<&CanvasObject, CanvasError> {
        self.objects
            .get(&handle)
            .ok_or(CanvasError::NotFound(handle))
    }

    fn sorted(&self, pred: impl Fn(&CanvasObject) -> bool) -> Vec<&CanvasObject> {
        let mut objs: Vec<&CanvasObject> = self.objects.values().filter(|o| pred(*o)).collect();
        objs.sort_by_key(|o| o.z_index);
        objs
    }

    fn is_ancestor(&self, ancestor: Handle, mut node: Handle) -> bool {
        while let Some(parent) = self.objects.get(&node).and_then(|o| o.parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }
}

// =============================================================================
// MEMORY CANVAS
// =============================================================================

/// Scene-graph canvas host held entirely in memory.
pub struct MemoryCanvas {
    scene: RwLock<Scene>,
    capabilities: Capabilities,
    faults: Faults,
}

impl MemoryCanvas {
    /// A document with one empty page and default capabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::default())
    }

    #[must_use]
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        let mut scene = Scene {
            objects: HashMap::new(),
            next_z: 0,
            created: 0,
            current_page: Uuid::nil(),
            selection: Vec::new(),
            fonts: HashSet::new(),
            notifications: Vec::new(),
        };
        scene.current_page = scene.insert(ObjectKind::Page, None, DEFAULT_PAGE_NAME);
        Self { scene: RwLock::new(scene), capabilities, faults: Faults::default() }
    }

    #[must_use]
    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub fn faults(&self) -> Faults {
        self.faults
    }

    /// All objects except pages, in creation order.
    pub async fn objects(&self) -> Vec<CanvasObject> {
        let scene = self.scene.read().await;
        scene
            .sorted(|o| o.kind != ObjectKind::Page)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn object(&self, handle: Handle) -> Option<CanvasObject> {
        self.scene.read().await.objects.get(&handle).cloned()
    }

    /// Pages, in creation order.
    pub async fn pages(&self) -> Vec<CanvasObject> {
        let scene = self.scene.read().await;
        scene
            .sorted(|o| o.kind == ObjectKind::Page)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of non-page objects.
    pub async fn object_count(&self) -> usize {
        let scene = self.scene.read().await;
        scene
            .objects
            .values()
            .filter(|o| o.kind != ObjectKind::Page)
            .count()
    }

    pub async fn selection(&self) -> Vec<Handle> {
        self.scene.read().await.selection.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.scene.read().await.notifications.clone()
    }
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CanvasApi for MemoryCanvas {
    async fn create(&self, kind: ObjectKind) -> Result<Handle, CanvasError> {
        match kind {
            ObjectKind::Section if !self.capabilities.sections => return Err(CanvasError::Unsupported("sections")),
            ObjectKind::Page if !self.capabilities.pages => return Err(CanvasError::Unsupported("page creation")),
            _ => {}
        }

        let mut scene = self.scene.write().await;
        if let Some(limit) = self.faults.create_limit {
            if scene.created >= limit {
                return Err(CanvasError::Rejected(format!("object limit of {limit} reached")));
            }
        }
        scene.created += 1;

        let parent = if kind == ObjectKind::Page { None } else { Some(scene.current_page) };
        Ok(scene.insert(kind, parent, ""))
    }

    async fn set_name(&self, handle: Handle, name: &str) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        scene.get_mut(handle)?.name = name.to_owned();
        Ok(())
    }

    async fn set_geometry(&self, handle: Handle, geometry: Geometry) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        let obj = scene.get_mut(handle)?;
        if obj.kind == ObjectKind::Page {
            return Err(CanvasError::Unsupported("page geometry"));
        }
        obj.geometry = geometry;
        Ok(())
    }

    async fn set_style(&self, handle: Handle, style: &Style) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        let obj = scene.get_mut(handle)?;
        if obj.kind == ObjectKind::Page {
            return Err(CanvasError::Unsupported("page fills"));
        }
        obj.style = style.clone();
        Ok(())
    }

    async fn set_text(&self, handle: Handle, text: &TextSpec) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        if !scene.fonts.contains(&text.font) {
            return Err(CanvasError::Rejected(format!("font not loaded: {}", text.font)));
        }
        let obj = scene.get_mut(handle)?;
        if obj.kind != ObjectKind::Text {
            return Err(CanvasError::Rejected(format!("{:?} cannot hold text", obj.kind)));
        }
        obj.text = Some(text.clone());
        Ok(())
    }

    async fn connect(
        &self,
        connector: Handle,
        from: Handle,
        from_anchor: Anchor,
        to: Handle,
        to_anchor: Anchor,
    ) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        scene.ensure(from)?;
        scene.ensure(to)?;
        let obj = scene.get_mut(connector)?;
        if obj.kind != ObjectKind::Connector {
            return Err(CanvasError::Rejected(format!("{:?} is not a connector", obj.kind)));
        }
        obj.connector = Some(ConnectorEnds { from, from_anchor, to, to_anchor });
        Ok(())
    }

    async fn group_into(&self, parent: Handle, children: &[Handle]) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        scene.ensure(parent)?;
        for &child in children {
            if child == parent || scene.is_ancestor(child, parent) {
                return Err(CanvasError::Rejected("cannot group an object into itself".into()));
            }
            let obj = scene.get_mut(child)?;
            if obj.kind == ObjectKind::Page {
                return Err(CanvasError::Rejected("pages cannot be grouped".into()));
            }
            obj.parent = Some(parent);
        }
        Ok(())
    }

    async fn preload_resources(&self, fonts: &[FontSpec]) -> Result<(), CanvasError> {
        if self.faults.preload {
            let names: Vec<String> = fonts.iter().map(ToString::to_string).collect();
            return Err(CanvasError::ResourceLoad(names.join(", ")));
        }
        let mut scene = self.scene.write().await;
        scene.fonts.extend(fonts.iter().cloned());
        Ok(())
    }

    async fn find_or_create_named_container(&self, name: &str) -> Result<Handle, CanvasError> {
        let mut scene = self.scene.write().await;
        let existing = scene
            .sorted(|o| o.kind == ObjectKind::Page && o.name == name)
            .first()
            .map(|o| o.id);
        if let Some(id) = existing {
            return Ok(id);
        }
        if !self.capabilities.pages {
            return Err(CanvasError::Unsupported("page creation"));
        }
        Ok(scene.insert(ObjectKind::Page, None, name))
    }

    async fn current_container(&self) -> Result<Handle, CanvasError> {
        Ok(self.scene.read().await.current_page)
    }

    async fn set_current_container(&self, handle: Handle) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        if scene.ensure(handle)?.kind != ObjectKind::Page {
            return Err(CanvasError::Rejected("current container must be a page".into()));
        }
        scene.current_page = handle;
        Ok(())
    }

    async fn set_metadata(&self, handle: Handle, key: &str, value: &str) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        scene
            .get_mut(handle)?
            .metadata
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get_metadata(&self, handle: Handle, key: &str) -> Result<Option<String>, CanvasError> {
        let scene = self.scene.read().await;
        Ok(scene.ensure(handle)?.metadata.get(key).cloned())
    }

    async fn find_tagged(&self, key: &str, value: &str) -> Result<Vec<Handle>, CanvasError> {
        let scene = self.scene.read().await;
        Ok(scene
            .sorted(|o| o.metadata.get(key).is_some_and(|v| v == value))
            .into_iter()
            .map(|o| o.id)
            .collect())
    }

    async fn children(&self, handle: Handle) -> Result<Vec<Handle>, CanvasError> {
        let scene = self.scene.read().await;
        scene.ensure(handle)?;
        Ok(scene
            .sorted(|o| o.parent == Some(handle))
            .into_iter()
            .map(|o| o.id)
            .collect())
    }

    async fn remove(&self, handle: Handle) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        if scene.ensure(handle)?.kind == ObjectKind::Page {
            return Err(CanvasError::Rejected("pages cannot be removed".into()));
        }
        let doomed: HashSet<Handle> = scene
            .objects
            .keys()
            .copied()
            .filter(|&id| id == handle || scene.is_ancestor(handle, id))
            .collect();
        scene.objects.retain(|id, _| !doomed.contains(id));
        scene.selection.retain(|id| !doomed.contains(id));
        Ok(())
    }

    async fn select_and_focus(&self, handles: &[Handle]) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        for &handle in handles {
            scene.ensure(handle)?;
        }
        scene.selection = handles.to_vec();
        Ok(())
    }

    async fn notify_user(&self, message: &str, options: NotifyOptions) -> Result<(), CanvasError> {
        let mut scene = self.scene.write().await;
        scene.notifications.push(Notification {
            message: message.to_owned(),
            severity: options.severity,
            timeout_ms: options.timeout_ms,
        });
        Ok(())
    }

    async fn editor_kind(&self) -> EditorKind {
        self.capabilities.editor
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
