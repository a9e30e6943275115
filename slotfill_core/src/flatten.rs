//! Slot tree flattening.
//!
//! Turns a nested tree into a flat mapping from qualified paths to nodes.
//! Node names are left untouched; paths are computed alongside the traversal.

use std::collections::BTreeMap;

use crate::slot::{Slot, join_path};

/// Result of [`flatten_slot_tree`].
#[derive(Debug, Clone, Default)]
pub struct FlattenedTree {
    /// Qualified path of every node (root included) to a copy of that node.
    pub add: BTreeMap<String, Slot>,
    /// Unqualified descendant names with the node that now lives under a
    /// qualified path. A registry evicts such a bare entry when it still holds
    /// the same slot.
    pub remove: Vec<(String, Slot)>,
}

impl FlattenedTree {
    #[must_use]
    pub fn len(&self) -> usize {
        self.add.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.add.contains_key(path)
    }
}

/// Flatten `root` depth-first into qualified paths.
#[must_use]
pub fn flatten_slot_tree(root: &Slot) -> FlattenedTree {
    let mut tree = FlattenedTree::default();
    visit(root, root.name().to_string(), &mut tree);
    tree
}

fn visit(node: &Slot, path: String, tree: &mut FlattenedTree) {
    for child in node.children() {
        tree.remove.push((child.name().to_string(), child.clone()));
        visit(child, join_path(&path, child.name()), tree);
    }
    tree.add.insert(path, node.clone());
}
