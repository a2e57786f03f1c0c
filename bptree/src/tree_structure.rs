//! Tree structure management operations for BPlusTreeMap.
//!
//! This module contains the tree-level queries that describe the overall
//! shape: size, height, node counts, and leaf navigation, plus clearing.

use crate::compact_arena::CompactArenaStats;
use crate::types::{BPlusTreeMap, NodeId, NodeRef, NULL_NODE};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K, V> BPlusTreeMap<K, V> {
    /// Returns the number of elements in the tree.
    ///
    /// Kept as a running counter, so this is `O(1)`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the root is a leaf node.
    ///
    /// An empty tree has no root and reports false.
    pub fn is_leaf_root(&self) -> bool {
        matches!(self.root, Some(NodeRef::Leaf(_, _)))
    }

    /// Number of levels from the root down to the leaves; 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;

        while let Some(node) = current {
            height += 1;
            current = match node {
                NodeRef::Leaf(_, _) => None,
                NodeRef::Branch(id, _) => self
                    .get_branch(id)
                    .and_then(|branch| branch.children.first().copied()),
            };
        }

        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Clear all items from the tree.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Count the leaf and branch nodes reachable from the root.
    ///
    /// Returns `(leaves, branches)`.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        match self.root {
            None => (0, 0),
            Some(root) => self.count_nodes_recursive(root),
        }
    }

    fn count_nodes_recursive(&self, node: NodeRef<K, V>) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_, _) => (1, 0),
            NodeRef::Branch(id, _) => match self.get_branch(id) {
                Some(branch) => branch.children.iter().fold((0, 1), |(leaves, branches), child| {
                    let (child_leaves, child_branches) = self.count_nodes_recursive(*child);
                    (leaves + child_leaves, branches + child_branches)
                }),
                None => (0, 0),
            },
        }
    }

    /// Sizes of every leaf, left to right along the leaf chain.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut current = self.get_first_leaf_id();

        while let Some(id) = current {
            match self.get_leaf(id) {
                Some(leaf) => {
                    sizes.push(leaf.keys.len());
                    current = (leaf.next != NULL_NODE).then_some(leaf.next);
                }
                None => break,
            }
        }

        sizes
    }

    /// Slot usage of the leaf arena.
    pub fn leaf_arena_stats(&self) -> CompactArenaStats {
        self.leaf_arena.stats()
    }

    /// Slot usage of the branch arena.
    pub fn branch_arena_stats(&self) -> CompactArenaStats {
        self.branch_arena.stats()
    }

    // ============================================================================
    // TREE NAVIGATION HELPERS
    // ============================================================================

    /// Get the ID of the first (leftmost) leaf in the tree.
    pub fn get_first_leaf_id(&self) -> Option<NodeId> {
        self.edge_leaf_id(|children| children.first())
    }

    /// Get the ID of the last (rightmost) leaf in the tree.
    pub fn get_last_leaf_id(&self) -> Option<NodeId> {
        self.edge_leaf_id(|children| children.last())
    }

    fn edge_leaf_id(
        &self,
        pick: impl Fn(&[NodeRef<K, V>]) -> Option<&NodeRef<K, V>>,
    ) -> Option<NodeId> {
        let mut current = self.root?;

        loop {
            match current {
                NodeRef::Leaf(id, _) => return Some(id),
                NodeRef::Branch(id, _) => {
                    current = *pick(self.get_branch(id)?.children.as_slice())?;
                }
            }
        }
    }
}
