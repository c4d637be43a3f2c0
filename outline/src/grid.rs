//! Grid packer for the page-design export.
//!
//! Lays out N equally sized frames row-major, `per_row` to a row, with a
//! fixed gap between frames. Tree structure plays no part here.

#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAMES_PER_ROW: usize = 5;
pub const DEFAULT_FRAME_SPACING: f64 = 100.0;
pub const DEFAULT_CONTAINER_PADDING: f64 = 100.0;

/// Error returned by [`pack_grid`] for an unusable spec.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("frames per row must be at least 1")]
    ZeroRowCapacity,
    #[error("invalid frame size {width}x{height}")]
    InvalidFrameSize { width: f64, height: f64 },
    #[error("invalid frame gap {spacing} or padding {padding}")]
    InvalidGap { spacing: f64, padding: f64 },
}

/// Frame size and packing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub frame_width: f64,
    pub frame_height: f64,
    pub per_row: usize,
    pub spacing: f64,
    pub padding: f64,
}

impl GridSpec {
    /// Frame size with the default row capacity, spacing and padding.
    #[must_use]
    pub fn with_frame(frame_width: f64, frame_height: f64) -> Self {
        Self {
            frame_width,
            frame_height,
            per_row: DEFAULT_FRAMES_PER_ROW,
            spacing: DEFAULT_FRAME_SPACING,
            padding: DEFAULT_CONTAINER_PADDING,
        }
    }
}

/// Placement of one frame. `x`/`y` are relative to the grid origin, before
/// container padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSlot {
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
}

/// Packed grid plus the bounds used to size the enclosing container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub slots: Vec<GridSlot>,
    /// Right edge of the rightmost frame.
    pub max_x: f64,
    /// Bottom edge of the lowest frame.
    pub max_y: f64,
    /// `max_x` plus padding on both sides.
    pub container_width: f64,
    /// `max_y` plus padding on both sides.
    pub container_height: f64,
}

/// Pack `count` frames into a grid.
///
/// # Errors
///
/// Returns [`GridError::ZeroRowCapacity`] if `per_row` is zero and
/// [`GridError::InvalidFrameSize`] if either frame dimension is not a
/// positive finite number, and [`GridError::InvalidGap`] if the spacing or
/// padding is negative or not finite.
pub fn pack_grid(count: usize, spec: &GridSpec) -> Result<GridLayout, GridError> {
    if spec.per_row == 0 {
        return Err(GridError::ZeroRowCapacity);
    }
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(spec.frame_width) || !valid(spec.frame_height) {
        return Err(GridError::InvalidFrameSize { width: spec.frame_width, height: spec.frame_height });
    }
    let gap = |v: f64| v.is_finite() && v >= 0.0;
    if !gap(spec.spacing) || !gap(spec.padding) {
        return Err(GridError::InvalidGap { spacing: spec.spacing, padding: spec.padding });
    }

    let step_x = spec.frame_width + spec.spacing;
    let step_y = spec.frame_height + spec.spacing;

    #[allow(clippy::cast_precision_loss)]
    let slots: Vec<GridSlot> = (0..count)
        .map(|i| {
            let row = i / spec.per_row;
            let col = i % spec.per_row;
            GridSlot { row, col, x: col as f64 * step_x, y: row as f64 * step_y }
        })
        .collect();

    if count == 0 {
        return Ok(GridLayout { slots, max_x: 0.0, max_y: 0.0, container_width: 0.0, container_height: 0.0 });
    }

    let cols = count.min(spec.per_row);
    let rows = count.div_ceil(spec.per_row);
    #[allow(clippy::cast_precision_loss)]
    let max_x = (cols - 1) as f64 * step_x + spec.frame_width;
    #[allow(clippy::cast_precision_loss)]
    let max_y = (rows - 1) as f64 * step_y + spec.frame_height;

    Ok(GridLayout {
        slots,
        max_x,
        max_y,
        container_width: max_x + spec.padding * 2.0,
        container_height: max_y + spec.padding * 2.0,
    })
}
