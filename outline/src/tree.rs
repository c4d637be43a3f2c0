//! Tree builder: flat depth-tagged records to an explicit forest.
//!
//! DESIGN
//! ======
//! A single left-to-right scan with an ancestor stack. Before a record is
//! pushed, every stacked node at the same or a deeper level is closed: it can
//! no longer receive children, so it moves into its parent (the node beneath
//! it on the stack) or, if nothing is beneath it, becomes a root. Each node is
//! pushed once and popped once, so construction is O(N).
//!
//! A record deeper than `previous + 1` simply attaches to the nearest
//! shallower node still on the stack. A first record with depth > 0 is still a
//! root; depth is never renormalized.

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;

use crate::parse::OutlineRecord;

/// A node in the outline forest. `id` is the record index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: usize,
    pub name: String,
    pub depth: usize,
    pub children: Vec<TreeNode>,
}

/// Independent root trees, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    pub roots: Vec<TreeNode>,
}

impl Forest {
    /// Total number of nodes across all trees.
    #[must_use]
    pub fn len(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Parent index of every node, indexed by node id.
    ///
    /// Read off the materialized forest; agrees with [`parent_indices`].
    #[must_use]
    pub fn parents(&self) -> Vec<Option<usize>> {
        fn walk(node: &TreeNode, parent: Option<usize>, out: &mut Vec<Option<usize>>) {
            if node.id >= out.len() {
                out.resize(node.id + 1, None);
            }
            out[node.id] = parent;
            for child in &node.children {
                walk(child, Some(node.id), out);
            }
        }

        let mut out = vec![None; self.len()];
        for root in &self.roots {
            walk(root, None, &mut out);
        }
        out
    }
}

/// Build the forest for a record sequence.
#[must_use]
pub fn build_forest(records: &[OutlineRecord]) -> Forest {
    let mut roots = Vec::new();
    let mut stack: Vec<TreeNode> = Vec::new();

    for (id, record) in records.iter().enumerate() {
        close_while(&mut stack, &mut roots, |top| top.depth >= record.depth);
        stack.push(TreeNode { id, name: record.name.clone(), depth: record.depth, children: Vec::new() });
    }
    close_while(&mut stack, &mut roots, |_| true);

    Forest { roots }
}

/// Pop stacked nodes matching `pred`, attaching each to the node beneath it.
fn close_while(stack: &mut Vec<TreeNode>, roots: &mut Vec<TreeNode>, pred: impl Fn(&TreeNode) -> bool) {
    while stack.last().is_some_and(&pred) {
        let Some(done) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Parent index for every record, computed with the same stack policy as
/// [`build_forest`] but without materializing any nodes.
#[must_use]
pub fn parent_indices(records: &[OutlineRecord]) -> Vec<Option<usize>> {
    let mut stack: Vec<usize> = Vec::new();
    let mut parents = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        while stack
            .last()
            .is_some_and(|&top| records[top].depth >= record.depth)
        {
            stack.pop();
        }
        parents.push(stack.last().copied());
        stack.push(i);
    }

    parents
}
