//! Edge deriver: parent-to-child connections from depth alone.
//!
//! Independent of the tree builder. A rolling table remembers the last record
//! seen at each depth; a record at depth `d > 0` connects to whatever was last
//! seen at `d - 1`. If no record has been seen at `d - 1` (the outline skipped
//! a level), no edge is emitted and the node renders disconnected.

#[cfg(test)]
#[path = "edges_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::parse::OutlineRecord;

/// A directed parent-to-child connection between two record indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub parent_index: usize,
    pub child_index: usize,
}

/// Derive the edge list for a record sequence, in child order.
#[must_use]
pub fn derive_edges(records: &[OutlineRecord]) -> Vec<Edge> {
    let mut last_seen_at_depth: Vec<Option<usize>> = Vec::new();
    let mut edges = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let depth = record.depth;
        if depth >= last_seen_at_depth.len() {
            last_seen_at_depth.resize(depth + 1, None);
        }
        last_seen_at_depth[depth] = Some(i);

        if depth > 0 {
            if let Some(parent_index) = last_seen_at_depth[depth - 1] {
                edges.push(Edge { parent_index, child_index: i });
            }
        }
    }

    edges
}
