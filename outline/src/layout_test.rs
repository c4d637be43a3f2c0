use super::*;
use crate::parse::parse;

const H: f64 = DEFAULT_HORIZONTAL_SPACING;
const V: f64 = DEFAULT_VERTICAL_SPACING;

fn at(positions: &[Position], i: usize) -> (f64, f64) {
    (positions[i].x, positions[i].y)
}

#[test]
fn layout_simple_site() {
    let positions = layout_records(&parse("Home\n  About\n  Contact\n    Team"), Spacing::default());
    assert_eq!(positions.len(), 4);
    assert_eq!(at(&positions, 0), (0.0, 0.0));
    assert_eq!(at(&positions, 1), (0.0, V));
    assert_eq!(at(&positions, 2), (H, V));
    assert_eq!(at(&positions, 3), (H, 2.0 * V));
}

#[test]
fn consecutive_siblings_are_exactly_h_apart() {
    let records = parse("Home\n  A\n  B\n    B1\n    B2\n    B3\n  C\n  D");
    let positions = layout_records(&records, Spacing::default());
    // Siblings under Home: 1, 2, 6, 7. Under B: 3, 4, 5.
    for pair in [[1, 2], [2, 6], [6, 7], [3, 4], [4, 5]] {
        let dx = positions[pair[1]].x - positions[pair[0]].x;
        assert!((dx - H).abs() < f64::EPSILON, "siblings {pair:?} dx = {dx}");
        assert!((positions[pair[1]].y - positions[pair[0]].y).abs() < f64::EPSILON);
    }
}

#[test]
fn children_start_at_parent_x_one_step_down() {
    let positions = layout_records(&parse("Home\n  A\n  B\n    B1\n    B2"), Spacing::default());
    assert_eq!(at(&positions, 3), (positions[2].x, positions[2].y + V));
    assert_eq!(at(&positions, 4), (positions[2].x + H, positions[2].y + V));
}

#[test]
fn root_trees_start_two_h_apart_regardless_of_width() {
    let records = parse("Home\n  A\n  B\n  C\n  D\nBlog\n  Posts\nShop");
    let positions = layout_records(&records, Spacing::default());
    assert_eq!(at(&positions, 0), (0.0, 0.0));
    assert_eq!(at(&positions, 5), (2.0 * H, 0.0));
    assert_eq!(at(&positions, 7), (4.0 * H, 0.0));
}

#[test]
fn wide_subtree_overlaps_next_root_tree() {
    // Documented limitation: Home's third child lands on Blog's column.
    let positions = layout_records(&parse("Home\n  A\n  B\n  C\nBlog"), Spacing::default());
    assert!((positions[3].x - positions[4].x).abs() < f64::EPSILON);
}

#[test]
fn disconnected_jump_still_gets_depth_offset() {
    let positions = layout_records(&parse("Home\n    Deep"), Spacing::default());
    assert_eq!(at(&positions, 1), (0.0, V));
}

#[test]
fn custom_spacing_is_respected() {
    let spacing = Spacing { horizontal: 10.0, vertical: 7.0 };
    let positions = layout_records(&parse("A\n  B\n  C\nD"), spacing);
    assert_eq!(at(&positions, 1), (0.0, 7.0));
    assert_eq!(at(&positions, 2), (10.0, 7.0));
    assert_eq!(at(&positions, 3), (20.0, 0.0));
}

#[test]
fn layout_is_deterministic() {
    let records = parse("A\n  B\n    C\n  D\nE\n  F");
    assert_eq!(layout_records(&records, Spacing::default()), layout_records(&records, Spacing::default()));
}

#[test]
fn layout_empty_forest() {
    assert!(layout_records(&[], Spacing::default()).is_empty());
}

#[test]
fn every_index_is_positioned_once() {
    let records = parse("A\n  B\n    C\n  D\nE\n  F\n      G");
    let forest = crate::tree::build_forest(&records);
    assert_eq!(forest.len(), records.len());
    assert_eq!(layout(&forest, Spacing::default()).len(), records.len());
}

#[test]
fn sparse_ids_are_positioned_without_panicking() {
    let leaf = |id: usize| TreeNode { id, name: format!("n{id}"), depth: 1, children: Vec::new() };
    let forest = Forest {
        roots: vec![TreeNode { id: 2, name: "root".into(), depth: 0, children: vec![leaf(7), leaf(4)] }],
    };
    let positions = layout(&forest, Spacing::default());
    assert_eq!(positions.len(), 8);
    assert_eq!(at(&positions, 2), (0.0, 0.0));
    assert_eq!(at(&positions, 7), (0.0, V));
    assert_eq!(at(&positions, 4), (H, V));
    assert_eq!(at(&positions, 0), (0.0, 0.0));
}
