//! DELETE operations for BPlusTreeMap.
//!
//! This module contains the removal path for the B+ tree: the recursive
//! descent, underflow resolution by merging or batch transfer between
//! siblings, and root collapse.
//!
//! A child that drops below `half` after a removal is repaired by its
//! parent. The parent pairs it with its right sibling, or with its left
//! sibling when the child is the last one. If the sibling is small enough
//! (`size <= order - half + 1`) the two are merged, which removes one
//! separator from the parent and may leave the parent underfull in turn.
//! Otherwise the sibling donates exactly the missing entries in a single
//! batch, and the separator between them is rotated; the parent keeps its
//! size and the repair stops there.

use crate::types::{BPlusTreeMap, BranchNode, LeafNode, NodeId, NodeRef, RemoveResult};
use tracing::trace;

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Remove a key from the tree, returning the value if it existed.
    ///
    /// Removing an absent key leaves the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.remove(&1), Some("one"));
    /// assert_eq!(tree.remove(&1), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let root = self.root?;

        let RemoveResult::Updated(removed, _) = self.remove_recursive(root, key);
        if removed.is_some() {
            self.len -= 1;
            self.collapse_root_if_needed();
        }

        #[cfg(feature = "testing")]
        self.assert_valid_after("remove");

        removed
    }

    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Remove from the subtree rooted at `node`, reporting whether that
    /// node is left underfull.
    fn remove_recursive(&mut self, node: NodeRef<K, V>, key: &K) -> RemoveResult<V> {
        match node {
            NodeRef::Leaf(id, _) => {
                let (removed, underfull) = self.expect_leaf_mut(id).remove(key);
                RemoveResult::Updated(removed, underfull)
            }
            NodeRef::Branch(id, _) => {
                let (child_index, child) = {
                    let branch = self.expect_branch(id);
                    let child_index = branch.find_child_index(key);
                    (child_index, branch.children[child_index])
                };

                let RemoveResult::Updated(removed, child_underfull) =
                    self.remove_recursive(child, key);
                if !child_underfull {
                    return RemoveResult::Updated(removed, false);
                }

                let underfull = self.rebalance_child(id, child_index);
                RemoveResult::Updated(removed, underfull)
            }
        }
    }

    /// Repair the underfull child at `child_index` of `branch_id`.
    /// Returns whether the branch itself is now underfull.
    fn rebalance_child(&mut self, branch_id: NodeId, child_index: usize) -> bool {
        let (separator_index, left, right, last) = {
            let branch = self.expect_branch(branch_id);
            assert!(
                !branch.keys.is_empty(),
                "branch {} has an underfull child but no sibling",
                branch_id
            );
            let last = child_index == branch.keys.len();
            let separator_index = if last { child_index - 1 } else { child_index };
            (
                separator_index,
                branch.children[separator_index],
                branch.children[separator_index + 1],
                last,
            )
        };

        let sibling = if last { left } else { right };
        if self.node_size(sibling) <= self.merge_threshold() {
            self.merge_children(branch_id, separator_index)
        } else {
            self.transfer_between_children(branch_id, separator_index, last);
            false
        }
    }

    /// Merge the children on either side of `separator_index` into the left one.
    /// Returns whether the parent branch is now underfull.
    fn merge_children(&mut self, branch_id: NodeId, separator_index: usize) -> bool {
        let (separator, right) = self
            .expect_branch_mut(branch_id)
            .remove_separator(separator_index);
        let left = self.expect_branch(branch_id).children[separator_index];

        match (left, right) {
            (NodeRef::Leaf(left_id, _), NodeRef::Leaf(right_id, _)) => {
                let right_leaf = self.take_leaf(right_id);
                let left_leaf = self.expect_leaf_mut(left_id);
                left_leaf.merge_from(right_leaf);
                trace!(left = left_id, right = right_id, size = left_leaf.size(), "merged leaves");
            }
            (NodeRef::Branch(left_id, _), NodeRef::Branch(right_id, _)) => {
                let right_branch = self.take_branch(right_id);
                let left_branch = self.expect_branch_mut(left_id);
                left_branch.merge_from(separator, right_branch);
                trace!(left = left_id, right = right_id, size = left_branch.size(), "merged branches");
            }
            _ => panic!(
                "siblings {} and {} of branch {} are at different depths",
                left.id(),
                right.id(),
                branch_id
            ),
        }

        self.expect_branch(branch_id).is_underfull()
    }

    /// Move the entries the underfull child is missing from its sibling in
    /// one batch, and rotate the separator between them.
    fn transfer_between_children(&mut self, branch_id: NodeId, separator_index: usize, from_left: bool) {
        let (left, right) = {
            let branch = self.expect_branch(branch_id);
            (
                branch.children[separator_index],
                branch.children[separator_index + 1],
            )
        };
        let recipient = if from_left { right } else { left };
        let deficit = self.half() - self.node_size(recipient);

        let new_separator = match (left, right) {
            (NodeRef::Leaf(left_id, _), NodeRef::Leaf(right_id, _)) => {
                if from_left {
                    let (keys, values) = self.expect_leaf_mut(left_id).pop_back(deficit);
                    self.expect_leaf_mut(right_id).prepend_entries(keys, values)
                } else {
                    let (keys, values) = self.expect_leaf_mut(right_id).pop_front(deficit);
                    self.expect_leaf_mut(left_id).append_entries(keys, values);
                    self.expect_leaf(right_id).keys[0].clone()
                }
            }
            (NodeRef::Branch(left_id, _), NodeRef::Branch(right_id, _)) => {
                let separator = self.expect_branch(branch_id).keys[separator_index].clone();
                if from_left {
                    let (keys, children) = self.expect_branch_mut(left_id).pop_back(deficit);
                    self.expect_branch_mut(right_id)
                        .prepend_from_left(separator, keys, children)
                } else {
                    let (keys, children) = self.expect_branch_mut(right_id).pop_front(deficit);
                    self.expect_branch_mut(left_id)
                        .append_from_right(separator, keys, children)
                }
            }
            _ => panic!(
                "siblings {} and {} of branch {} are at different depths",
                left.id(),
                right.id(),
                branch_id
            ),
        };

        self.expect_branch_mut(branch_id).keys[separator_index] = new_separator;
        trace!(
            parent = branch_id,
            donor = if from_left { left.id() } else { right.id() },
            recipient = recipient.id(),
            moved = deficit,
            "transferred entries"
        );
    }

    /// Shrink the tree after a removal: a branch root without separators
    /// is replaced by its only child, and an empty leaf root empties the tree.
    fn collapse_root_if_needed(&mut self) {
        match self.root {
            Some(NodeRef::Branch(id, _)) if self.expect_branch(id).is_empty() => {
                let old_root = self.take_branch(id);
                debug_assert_eq!(old_root.children.len(), 1);
                self.root = old_root.children.first().copied();
                trace!(old_root = id, height = self.height(), "collapsed root");
            }
            Some(NodeRef::Leaf(id, _)) if self.expect_leaf(id).is_empty() => {
                self.take_leaf(id);
                self.root = None;
                trace!(old_root = id, "removed last leaf");
            }
            _ => {}
        }
    }

    fn node_size(&self, node: NodeRef<K, V>) -> usize {
        match node {
            NodeRef::Leaf(id, _) => self.expect_leaf(id).size(),
            NodeRef::Branch(id, _) => self.expect_branch(id).size(),
        }
    }

    /// Free a leaf slot and return its contents.
    fn take_leaf(&mut self, id: NodeId) -> LeafNode<K, V> {
        match self.leaf_arena.deallocate(id) {
            Some(leaf) => leaf,
            None => panic!("leaf {} freed twice", id),
        }
    }

    /// Free a branch slot and return its contents.
    fn take_branch(&mut self, id: NodeId) -> BranchNode<K, V> {
        match self.branch_arena.deallocate(id) {
            Some(branch) => branch,
            None => panic!("branch {} freed twice", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(order: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTreeMap<i32, i32> {
        let mut tree = BPlusTreeMap::new(order).unwrap();
        for key in keys {
            tree.insert(key, key * 2);
        }
        tree
    }

    fn root_keys(tree: &BPlusTreeMap<i32, i32>) -> Vec<i32> {
        match tree.root {
            Some(NodeRef::Branch(id, _)) => tree.expect_branch(id).keys.clone(),
            Some(NodeRef::Leaf(id, _)) => tree.expect_leaf(id).keys.clone(),
            None => Vec::new(),
        }
    }

    #[test]
    fn test_remove_from_empty_tree() {
        let mut tree = tree_with(4, []);
        assert_eq!(tree.remove(&1), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let mut tree = tree_with(4, 0..30);
        let shape = tree.count_nodes_in_tree();
        assert_eq!(tree.remove(&100), None);
        assert_eq!(tree.remove(&-3), None);
        assert_eq!(tree.len(), 30);
        assert_eq!(tree.count_nodes_in_tree(), shape);
    }

    #[test]
    fn test_leaf_merge_with_right_sibling() {
        // Leaves [10, 20] and [25, 30, 40] under separator 25
        let mut tree = tree_with(4, [10, 20, 30, 40, 25]);
        assert_eq!(tree.leaf_sizes(), vec![2, 3]);

        // Left leaf underflows; right has 3 <= threshold 3, so they merge and
        // the root collapses back into a single leaf.
        assert_eq!(tree.remove(&10), Some(20));
        assert!(tree.is_leaf_root());
        assert_eq!(tree.leaf_sizes(), vec![4]);
        assert_eq!(tree.leaf_arena.len(), 1);
        assert_eq!(tree.branch_arena.len(), 0);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_leaf_merge_with_left_sibling_when_last() {
        let mut tree = tree_with(4, [10, 20, 30, 40, 25]);
        // Drain the right leaf; it is the last child so it merges leftwards
        tree.remove(&40);
        tree.remove(&30);
        assert!(tree.is_leaf_root());
        let keys: Vec<_> = tree.keys().copied().collect();
        assert_eq!(keys, vec![10, 20, 25]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_leaf_transfer_from_right_sibling() {
        // order 6: half 3, merge threshold 4
        let mut tree = tree_with(6, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.leaf_sizes(), vec![3, 4]);
        tree.insert(8, 16);
        tree.insert(9, 18);
        assert_eq!(tree.leaf_sizes(), vec![3, 6]);

        // Left underflows to 2; right has 6 > 4, so one entry moves left
        tree.remove(&1);
        assert_eq!(tree.leaf_sizes(), vec![3, 5]);
        assert_eq!(root_keys(&tree), vec![5]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_leaf_transfer_from_left_sibling() {
        let mut tree = tree_with(6, [4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(tree.leaf_sizes(), vec![3, 4]);
        tree.insert(1, 2);
        tree.insert(2, 4);
        tree.insert(3, 6);
        assert_eq!(tree.leaf_sizes(), vec![6, 4]);

        // Right (last) leaf underflows to 2; left has 6 > 4 and donates one
        tree.remove(&10);
        tree.remove(&9);
        assert_eq!(tree.leaf_sizes(), vec![5, 3]);
        assert_eq!(root_keys(&tree), vec![6]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_root_collapse_after_cascading_merge() {
        let mut tree = tree_with(4, 0..64);
        let height = tree.height();
        assert!(height >= 3);

        for key in 0..64 {
            assert_eq!(tree.remove(&key), Some(key * 2));
            assert!(tree.check_invariants(), "invalid after removing {}", key);
        }
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
        assert_eq!(tree.leaf_arena.len(), 0);
        assert_eq!(tree.branch_arena.len(), 0);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut tree = tree_with(4, 0..200);
        for key in 0..150 {
            tree.remove(&key);
        }
        let freed = tree.leaf_arena.free_count();
        assert!(freed > 0);
        for key in 0..150 {
            tree.insert(key, key);
        }
        assert!(tree.leaf_arena.free_count() < freed);
        assert!(tree.check_invariants());
    }
}
