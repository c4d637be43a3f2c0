//! Layout engine: assigns a position to every outline record.
//!
//! DESIGN
//! ======
//! Depth-first pre-order over the forest. Within one sibling list a cursor
//! starts at the list's start X and advances by `horizontal` after each node.
//! A node's children start a fresh cursor at the node's own X, one
//! `vertical` step lower. Children are not centered under their parent.
//!
//! Each root tree starts `2 * horizontal` to the right of the previous root's
//! start, whatever the previous tree's width.
//!
//! KNOWN LIMITATION
//! ================
//! Subtrees are not collision-checked. A node with several children pushes
//! its descendants right of the next sibling's X, so wide subtrees overlap
//! their neighbours (and neighbouring root trees). This matches the placement
//! users already rely on and is left as is.

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::parse::OutlineRecord;
use crate::tree::{Forest, TreeNode, build_forest};

/// Default horizontal step between siblings.
pub const DEFAULT_HORIZONTAL_SPACING: f64 = 250.0;
/// Default vertical step between a parent and its children.
pub const DEFAULT_VERTICAL_SPACING: f64 = 200.0;

/// Top-left corner of a laid-out node, in canvas units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Spacing constants for the tree layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self { horizontal: DEFAULT_HORIZONTAL_SPACING, vertical: DEFAULT_VERTICAL_SPACING }
    }
}

/// Lay out a forest. The result is indexed by node id and has one entry per
/// node for forests from [`build_forest`]; hand-built forests with sparse ids
/// get default positions in the gaps.
#[must_use]
pub fn layout(forest: &Forest, spacing: Spacing) -> Vec<Position> {
    let mut positions = vec![Position::default(); forest.len()];

    let mut tree_start_x = 0.0;
    for root in &forest.roots {
        layout_siblings(std::slice::from_ref(root), tree_start_x, 0.0, spacing, &mut positions);
        tree_start_x += spacing.horizontal * 2.0;
    }

    positions
}

/// Build the forest for `records` and lay it out.
#[must_use]
pub fn layout_records(records: &[OutlineRecord], spacing: Spacing) -> Vec<Position> {
    layout(&build_forest(records), spacing)
}

fn layout_siblings(nodes: &[TreeNode], start_x: f64, y: f64, spacing: Spacing, positions: &mut Vec<Position>) {
    let mut cursor = start_x;
    for node in nodes {
        if node.id >= positions.len() {
            positions.resize(node.id + 1, Position::default());
        }
        positions[node.id] = Position { x: cursor, y };
        if !node.children.is_empty() {
            layout_siblings(&node.children, cursor, y + spacing.vertical, spacing, positions);
        }
        cursor += spacing.horizontal;
    }
}
