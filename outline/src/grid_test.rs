use super::*;

fn spec() -> GridSpec {
    GridSpec { frame_width: 300.0, frame_height: 200.0, per_row: 5, spacing: 100.0, padding: 100.0 }
}

#[test]
fn item_five_wraps_to_second_row() {
    let grid = pack_grid(12, &spec()).unwrap();
    let slot = grid.slots[5];
    assert_eq!((slot.row, slot.col), (1, 0));
    assert!((slot.x).abs() < f64::EPSILON);
    assert!((slot.y - 300.0).abs() < f64::EPSILON);
}

#[test]
fn slots_are_row_major() {
    let grid = pack_grid(12, &spec()).unwrap();
    assert_eq!(grid.slots.len(), 12);
    let last = grid.slots[11];
    assert_eq!((last.row, last.col), (2, 1));
    assert!((last.x - 400.0).abs() < f64::EPSILON);
    assert!((last.y - 600.0).abs() < f64::EPSILON);
}

#[test]
fn bounds_for_multiple_rows() {
    let grid = pack_grid(12, &spec()).unwrap();
    // Full row of 5: 4 * 400 + 300. Three rows: 2 * 300 + 200.
    assert!((grid.max_x - 1900.0).abs() < f64::EPSILON);
    assert!((grid.max_y - 800.0).abs() < f64::EPSILON);
    assert!((grid.container_width - 2100.0).abs() < f64::EPSILON);
    assert!((grid.container_height - 1000.0).abs() < f64::EPSILON);
}

#[test]
fn bounds_for_partial_single_row() {
    let grid = pack_grid(3, &spec()).unwrap();
    assert!((grid.max_x - 1100.0).abs() < f64::EPSILON);
    assert!((grid.max_y - 200.0).abs() < f64::EPSILON);
}

#[test]
fn single_frame_bounds_are_frame_size() {
    let grid = pack_grid(1, &spec()).unwrap();
    assert!((grid.max_x - 300.0).abs() < f64::EPSILON);
    assert!((grid.max_y - 200.0).abs() < f64::EPSILON);
    assert!((grid.container_width - 500.0).abs() < f64::EPSILON);
}

#[test]
fn empty_grid_has_zero_bounds() {
    let grid = pack_grid(0, &spec()).unwrap();
    assert!(grid.slots.is_empty());
    assert!((grid.max_x).abs() < f64::EPSILON);
    assert!((grid.container_height).abs() < f64::EPSILON);
}

#[test]
fn zero_row_capacity_errors() {
    let bad = GridSpec { per_row: 0, ..spec() };
    assert_eq!(pack_grid(3, &bad).unwrap_err(), GridError::ZeroRowCapacity);
}

#[test]
fn non_positive_frame_size_errors() {
    let bad = GridSpec { frame_width: 0.0, ..spec() };
    assert!(matches!(pack_grid(3, &bad), Err(GridError::InvalidFrameSize { .. })));
    let nan = GridSpec { frame_height: f64::NAN, ..spec() };
    assert!(matches!(pack_grid(3, &nan), Err(GridError::InvalidFrameSize { .. })));
}

#[test]
fn bad_gap_or_padding_errors() {
    for bad in [
        GridSpec { spacing: f64::NAN, ..spec() },
        GridSpec { spacing: f64::INFINITY, ..spec() },
        GridSpec { padding: -500.0, ..spec() },
    ] {
        assert!(matches!(pack_grid(6, &bad), Err(GridError::InvalidGap { .. })), "{bad:?}");
    }
    let tight = GridSpec { spacing: 0.0, padding: 0.0, ..spec() };
    let grid = pack_grid(6, &tight).unwrap();
    assert!((grid.slots[5].y - tight.frame_height).abs() < f64::EPSILON);
}

#[test]
fn with_frame_uses_defaults() {
    let s = GridSpec::with_frame(1440.0, 1024.0);
    assert_eq!(s.per_row, DEFAULT_FRAMES_PER_ROW);
    assert!((s.spacing - DEFAULT_FRAME_SPACING).abs() < f64::EPSILON);
    assert!((s.padding - DEFAULT_CONTAINER_PADDING).abs() < f64::EPSILON);
}

#[test]
fn every_index_gets_one_slot() {
    let grid = pack_grid(7, &GridSpec { per_row: 3, ..spec() }).unwrap();
    let cells: Vec<(usize, usize)> = grid.slots.iter().map(|s| (s.row, s.col)).collect();
    assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0)]);
}
