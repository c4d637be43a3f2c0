//! Discovery of previously built diagrams through their metadata tags.
//!
//! Sitemap root groups carry `sitemap = "true"`; export containers carry
//! `pageDesigns = "true"`. Both are found with [`CanvasApi::find_tagged`],
//! oldest first, so "most recent" is always the last handle.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use outline::{OutlineRecord, to_indented_text};

use super::{META_CREATED_AT, META_PAGE_DEPTH, META_PAGE_DESIGNS, META_PAGE_INDEX, META_PAGE_NAME, META_SITEMAP, META_SITEMAP_TEXT};
use crate::canvas::{CanvasApi, CanvasError, Handle};

/// Root groups of every built sitemap, oldest first.
///
/// # Errors
///
/// Propagates the collaborator's discovery failure.
pub async fn existing_sitemaps(canvas: &dyn CanvasApi) -> Result<Vec<Handle>, CanvasError> {
    canvas.find_tagged(META_SITEMAP, "true").await
}

/// Export containers, oldest first.
///
/// # Errors
///
/// Propagates the collaborator's discovery failure.
pub async fn existing_page_designs(canvas: &dyn CanvasApi) -> Result<Vec<Handle>, CanvasError> {
    canvas.find_tagged(META_PAGE_DESIGNS, "true").await
}

/// Remove the most recently built sitemap. Returns whether one existed.
///
/// # Errors
///
/// Propagates discovery or removal failures.
pub async fn remove_latest_sitemap(canvas: &dyn CanvasApi) -> Result<bool, CanvasError> {
    let Some(latest) = existing_sitemaps(canvas).await?.pop() else {
        return Ok(false);
    };
    canvas.remove(latest).await?;
    info!(%latest, "removed latest sitemap");
    Ok(true)
}

/// Remove every built sitemap. Returns how many were removed.
///
/// # Errors
///
/// Propagates discovery or removal failures. Sitemaps removed before the
/// failure stay removed.
pub async fn remove_all_sitemaps(canvas: &dyn CanvasApi) -> Result<usize, CanvasError> {
    let sitemaps = existing_sitemaps(canvas).await?;
    for &handle in &sitemaps {
        canvas.remove(handle).await?;
    }
    info!(removed = sitemaps.len(), "removed all sitemaps");
    Ok(sitemaps.len())
}

/// Outline text of the most recent diagram, if any.
///
/// The latest sitemap and the latest export container are compared by their
/// `createdAt` tags and the newer one wins; the sitemap wins a tie or an
/// unreadable timestamp. Stored `sitemapText` is used when present; an
/// export container without it is reconstructed from its frames' page tags.
///
/// # Errors
///
/// Propagates collaborator failures.
pub async fn recover_outline(canvas: &dyn CanvasApi) -> Result<Option<String>, CanvasError> {
    let sitemap = existing_sitemaps(canvas).await?.last().copied();
    let export = existing_page_designs(canvas).await?.last().copied();

    let export_is_newer = match (sitemap, export) {
        (Some(sitemap), Some(export)) => created_at(canvas, export).await? > created_at(canvas, sitemap).await?,
        _ => false,
    };
    if !export_is_newer {
        if let Some(latest) = sitemap {
            if let Some(text) = canvas.get_metadata(latest, META_SITEMAP_TEXT).await? {
                return Ok(Some(text));
            }
        }
    }

    let Some(container) = export else {
        return Ok(None);
    };
    if let Some(text) = canvas.get_metadata(container, META_SITEMAP_TEXT).await? {
        return Ok(Some(text));
    }

    debug!(%container, "reconstructing outline from page frames");
    let mut pages: Vec<(usize, OutlineRecord)> = Vec::new();
    for child in canvas.children(container).await? {
        let Some(depth) = canvas.get_metadata(child, META_PAGE_DEPTH).await? else {
            continue;
        };
        let Some(name) = canvas.get_metadata(child, META_PAGE_NAME).await? else {
            continue;
        };
        let index = canvas
            .get_metadata(child, META_PAGE_INDEX)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        pages.push((index, OutlineRecord::new(name, depth.parse().unwrap_or(0))));
    }
    pages.sort_by_key(|(index, _)| *index);

    let records: Vec<OutlineRecord> = pages.into_iter().map(|(_, record)| record).collect();
    Ok(Some(to_indented_text(&records)))
}

async fn created_at(canvas: &dyn CanvasApi, handle: Handle) -> Result<Option<OffsetDateTime>, CanvasError> {
    let stamp = canvas.get_metadata(handle, META_CREATED_AT).await?;
    Ok(stamp.and_then(|s| OffsetDateTime::parse(&s, &Rfc3339).ok()))
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
