//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the sitemap configuration and a map of open documents. Each
//! document owns its in-memory canvas plus a build lock, so two builds
//! against the same document never interleave their canvas calls.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::canvas::MemoryCanvas;
use crate::canvas::memory::{Capabilities, Faults};
use crate::config::SitemapConfig;

// =============================================================================
// DOCUMENT
// =============================================================================

/// An open host document.
pub struct Document {
    pub canvas: MemoryCanvas,
    /// Held for the duration of a build or export.
    pub build_lock: Mutex<()>,
}

impl Document {
    #[must_use]
    pub fn new(capabilities: Capabilities, faults: Faults) -> Self {
        Self {
            canvas: MemoryCanvas::with_capabilities(capabilities).with_faults(faults),
            build_lock: Mutex::new(()),
        }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<RwLock<HashMap<Uuid, Arc<Document>>>>,
    pub config: SitemapConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: SitemapConfig) -> Self {
        Self { documents: Arc::new(RwLock::new(HashMap::new())), config }
    }

    /// Open a new empty document and return its ID.
    pub async fn open_document(&self, capabilities: Capabilities, faults: Faults) -> Uuid {
        let id = Uuid::new_v4();
        self.documents
            .write()
            .await
            .insert(id, Arc::new(Document::new(capabilities, faults)));
        id
    }

    pub async fn document(&self, id: Uuid) -> Option<Arc<Document>> {
        self.documents.read().await.get(&id).cloned()
    }

    /// Close a document and free its canvas. Returns false if it was not open.
    ///
    /// The document leaves the map first so no new build can find it, then
    /// any build already running is waited out before the canvas is dropped.
    pub async fn close_document(&self, id: Uuid) -> bool {
        let Some(doc) = self.documents.write().await.remove(&id) else {
            return false;
        };
        let _build = doc.build_lock.lock().await;
        let objects = doc.canvas.object_count().await;
        info!(%id, objects, "document closed");
        true
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
