//! INSERT operations for BPlusTreeMap.
//!
//! This module contains the insertion path for the B+ tree: the recursive
//! descent, placement of split siblings in the arenas, leaf chain upkeep,
//! and root growth.

use crate::types::{
    BPlusTreeMap, BranchNode, InsertResult, LeafNode, NodeRef, SplitNodeData,
};
use tracing::trace;

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Insert a key-value pair into the tree.
    ///
    /// If the key already exists its value is replaced in place and the old
    /// value is returned; the structure of the tree does not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "ONE"), Some("one"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let old_value = match self.root {
            None => {
                let mut leaf = LeafNode::new(self.order);
                leaf.append_entries(vec![key], vec![value]);
                let root_id = self.leaf_arena.allocate(leaf);
                self.root = Some(NodeRef::leaf(root_id));
                None
            }
            Some(root) => match self.insert_recursive(root, key, value) {
                InsertResult::Updated(old_value) => old_value,
                InsertResult::Split {
                    new_node_data,
                    separator_key,
                } => {
                    let new_node = self.place_split_node(root, new_node_data);
                    self.new_root(root, separator_key, new_node);
                    None
                }
            },
        };

        if old_value.is_none() {
            self.len += 1;
        }

        #[cfg(feature = "testing")]
        self.assert_valid_after("insert");

        old_value
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Insert into the subtree rooted at `node`, reporting a split to the caller.
    fn insert_recursive(&mut self, node: NodeRef<K, V>, key: K, value: V) -> InsertResult<K, V> {
        match node {
            NodeRef::Leaf(id, _) => self.expect_leaf_mut(id).insert(key, value),
            NodeRef::Branch(id, _) => {
                let (child_index, child) = {
                    let branch = self.expect_branch(id);
                    let child_index = branch.find_child_index(&key);
                    (child_index, branch.children[child_index])
                };

                match self.insert_recursive(child, key, value) {
                    InsertResult::Updated(old_value) => InsertResult::Updated(old_value),
                    InsertResult::Split {
                        new_node_data,
                        separator_key,
                    } => {
                        let new_child = self.place_split_node(child, new_node_data);
                        let branch = self.expect_branch_mut(id);
                        match branch.insert_child_and_split_if_needed(
                            child_index,
                            separator_key,
                            new_child,
                        ) {
                            None => InsertResult::Updated(None),
                            Some((new_branch, promoted_key)) => InsertResult::Split {
                                new_node_data: SplitNodeData::Branch(new_branch),
                                separator_key: promoted_key,
                            },
                        }
                    }
                }
            }
        }
    }

    /// Allocate the right half of a split of `split_node` and return its handle.
    ///
    /// A new leaf is spliced into the leaf chain directly after the node it
    /// was split from.
    fn place_split_node(
        &mut self,
        split_node: NodeRef<K, V>,
        new_node_data: SplitNodeData<K, V>,
    ) -> NodeRef<K, V> {
        match new_node_data {
            SplitNodeData::Leaf(new_leaf) => {
                let right_size = new_leaf.size();
                let new_id = self.leaf_arena.allocate(new_leaf);
                let left = self.expect_leaf_mut(split_node.id());
                left.next = new_id;
                trace!(
                    left = split_node.id(),
                    right = new_id,
                    left_size = left.size(),
                    right_size,
                    "split leaf"
                );
                NodeRef::leaf(new_id)
            }
            SplitNodeData::Branch(new_branch) => {
                let right_size = new_branch.size();
                let new_id = self.branch_arena.allocate(new_branch);
                trace!(
                    left = split_node.id(),
                    right = new_id,
                    left_size = self.expect_branch(split_node.id()).size(),
                    right_size,
                    "split branch"
                );
                NodeRef::branch(new_id)
            }
        }
    }

    /// Grow the tree by one level above a root that just split.
    fn new_root(&mut self, left: NodeRef<K, V>, separator_key: K, right: NodeRef<K, V>) {
        let mut new_root = BranchNode::new(self.order);
        new_root.keys.push(separator_key);
        new_root.children.push(left);
        new_root.children.push(right);

        let root_id = self.branch_arena.allocate(new_root);
        self.root = Some(NodeRef::branch(root_id));
        trace!(root = root_id, height = self.height(), "grew root");
    }
}
