//! Outline algorithms for the sitemap builder.
//!
//! Everything in this crate is a pure function over an indented text outline:
//! no canvas, no I/O. The server hands the results to a canvas collaborator
//! that turns positions and edges into visible objects.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`parse`] | Indented text to ordered `(name, depth)` records, and back |
//! | [`tree`] | Depth-stack forest construction and parent indices |
//! | [`layout`] | Cartesian positions for every record |
//! | [`edges`] | Parent-to-child connections derived from depth alone |
//! | [`grid`] | Row-major grid packing for the frame export |

pub mod edges;
pub mod grid;
pub mod layout;
pub mod parse;
pub mod tree;

pub use edges::{Edge, derive_edges};
pub use grid::{GridError, GridLayout, GridSlot, GridSpec, pack_grid};
pub use layout::{Position, Spacing, layout, layout_records};
pub use parse::{INDENT_WIDTH, OutlineRecord, parse, to_indented_text};
pub use tree::{Forest, TreeNode, build_forest, parent_indices};
