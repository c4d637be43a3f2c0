use super::*;
use crate::parse::parse;

fn pairs(edges: &[Edge]) -> Vec<(usize, usize)> {
    edges.iter().map(|e| (e.parent_index, e.child_index)).collect()
}

#[test]
fn edges_for_simple_site() {
    let edges = derive_edges(&parse("Home\n  About\n  Contact\n    Team"));
    assert_eq!(pairs(&edges), vec![(0, 1), (0, 2), (2, 3)]);
}

#[test]
fn edges_skip_missing_level() {
    let records = parse("Home\n    Deep");
    assert_eq!(records[1].depth, 2);
    assert!(derive_edges(&records).is_empty());
}

#[test]
fn edges_empty_for_roots_only() {
    assert!(derive_edges(&parse("A\nB\nC")).is_empty());
    assert!(derive_edges(&[]).is_empty());
}

#[test]
fn edges_follow_latest_parent_at_each_depth() {
    let edges = derive_edges(&parse("A\n  B\nC\n  D\n    E"));
    assert_eq!(pairs(&edges), vec![(0, 1), (2, 3), (3, 4)]);
}

#[test]
fn edges_use_stale_entry_after_root_change() {
    // `last_seen_at_depth[1]` still holds B when F arrives at depth 2.
    let edges = derive_edges(&parse("A\n  B\nC\n    F"));
    assert_eq!(pairs(&edges), vec![(0, 1), (1, 3)]);
}

#[test]
fn edges_one_per_non_root_in_well_formed_outline() {
    let records = parse("A\n  B\n    C\n  D\nE\n  F");
    let non_roots = records.iter().filter(|r| r.depth > 0).count();
    assert_eq!(derive_edges(&records).len(), non_roots);
}
