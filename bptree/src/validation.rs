//! Validation and debugging utilities for BPlusTreeMap.
//!
//! This module contains the structural validator, the checked variants of
//! insert and remove, and the tree renderer used for debugging.

use crate::error::{BPlusTreeError, BTreeResult, BTreeResultExt, ModifyResult};
use crate::types::{BPlusTreeMap, NodeId, NodeRef, NULL_NODE};
use std::fmt;

/// Facts gathered while walking the tree, checked once the walk is done.
struct WalkState {
    leaf_depth: Option<usize>,
    leaves: Vec<NodeId>,
    branches: usize,
    entries: usize,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Check if the tree maintains B+ tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every structural invariant, reporting the first one violated.
    ///
    /// Covers key ordering and separator bounds, child counts, node
    /// capacity and occupancy, uniform leaf depth, the leaf chain, arena
    /// bookkeeping, and the length counter.
    pub fn validate(&self) -> BTreeResult<()> {
        let root = match self.root {
            Some(root) => root,
            None => return self.check_empty_tree(),
        };

        let mut state = WalkState {
            leaf_depth: None,
            leaves: Vec::new(),
            branches: 0,
            entries: 0,
        };
        self.check_node(root, None, None, true, 0, &mut state)?;

        self.check_leaf_chain(&state.leaves)?;
        self.check_arena_consistency(state.leaves.len(), state.branches)?;

        if state.entries != self.len {
            return Err(BPlusTreeError::data_integrity(
                "Length counter",
                &format!("{} entries in leaves, counter says {}", state.entries, self.len),
            ));
        }

        Ok(())
    }

    fn check_empty_tree(&self) -> BTreeResult<()> {
        if self.len != 0 {
            return Err(BPlusTreeError::data_integrity(
                "Length counter",
                &format!("tree has no root but counter says {}", self.len),
            ));
        }
        self.check_arena_consistency(0, 0)
    }

    /// Recursively check a node and its subtree against the key bounds
    /// `[lower, upper)` inherited from its ancestors.
    fn check_node(
        &self,
        node: NodeRef<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
        is_root: bool,
        depth: usize,
        state: &mut WalkState,
    ) -> BTreeResult<()> {
        match node {
            NodeRef::Leaf(id, _) => {
                let leaf = self.get_leaf(id).ok_or_else(|| {
                    BPlusTreeError::corrupted_tree("Arena", &format!("leaf {} is not allocated", id))
                })?;
                let context = format!("Leaf {}", id);

                if leaf.keys.len() != leaf.values.len() {
                    return Err(BPlusTreeError::data_integrity(
                        &context,
                        &format!("{} keys but {} values", leaf.keys.len(), leaf.values.len()),
                    ));
                }
                check_keys(&context, &leaf.keys, lower, upper)?;
                self.check_size(&context, leaf.size(), if is_root { 1 } else { self.half() })?;

                match state.leaf_depth {
                    None => state.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(BPlusTreeError::corrupted_tree(
                            "Depth",
                            &format!("leaf {} at depth {}, expected {}", id, depth, expected),
                        ));
                    }
                    Some(_) => {}
                }

                state.leaves.push(id);
                state.entries += leaf.keys.len();
                Ok(())
            }
            NodeRef::Branch(id, _) => {
                let branch = self.get_branch(id).ok_or_else(|| {
                    BPlusTreeError::corrupted_tree("Arena", &format!("branch {} is not allocated", id))
                })?;
                let context = format!("Branch {}", id);

                if branch.children.len() != branch.keys.len() + 1 {
                    return Err(BPlusTreeError::data_integrity(
                        &context,
                        &format!(
                            "{} keys but {} children",
                            branch.keys.len(),
                            branch.children.len()
                        ),
                    ));
                }
                check_keys(&context, &branch.keys, lower, upper)?;
                self.check_size(&context, branch.size(), if is_root { 2 } else { self.half() })?;

                state.branches += 1;
                for (i, child) in branch.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&branch.keys[i - 1]) };
                    let child_upper = branch.keys.get(i).or(upper);
                    self.check_node(*child, child_lower, child_upper, false, depth + 1, state)?;
                }
                Ok(())
            }
        }
    }

    fn check_size(&self, context: &str, size: usize, min: usize) -> BTreeResult<()> {
        if size > self.order {
            return Err(BPlusTreeError::data_integrity(
                context,
                &format!("size {} exceeds order {}", size, self.order),
            ));
        }
        if size < min {
            return Err(BPlusTreeError::data_integrity(
                context,
                &format!("size {} is below minimum {}", size, min),
            ));
        }
        Ok(())
    }

    /// The `next` links must visit exactly the leaves of an in-order walk, in that order.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> BTreeResult<()> {
        let mut chain = Vec::with_capacity(leaves.len());
        let mut current = leaves.first().copied().unwrap_or(NULL_NODE);

        while current != NULL_NODE {
            if chain.len() > leaves.len() {
                return Err(BPlusTreeError::corrupted_tree(
                    "Leaf chain",
                    &format!("longer than the {} leaves in the tree", leaves.len()),
                ));
            }
            chain.push(current);
            current = match self.get_leaf(current) {
                Some(leaf) => leaf.next,
                None => {
                    return Err(BPlusTreeError::corrupted_tree(
                        "Leaf chain",
                        &format!("links to unallocated leaf {}", current),
                    ))
                }
            };
        }

        if chain != leaves {
            return Err(BPlusTreeError::corrupted_tree(
                "Leaf chain",
                &format!("tree order {:?}, chain order {:?}", leaves, chain),
            ));
        }
        Ok(())
    }

    /// Every allocated slot must be reachable from the root.
    fn check_arena_consistency(&self, leaves: usize, branches: usize) -> BTreeResult<()> {
        if self.leaf_arena.len() != leaves {
            return Err(BPlusTreeError::corrupted_tree(
                "Leaf arena",
                &format!("{} in tree vs {} in arena", leaves, self.leaf_arena.len()),
            ));
        }
        if self.branch_arena.len() != branches {
            return Err(BPlusTreeError::corrupted_tree(
                "Branch arena",
                &format!("{} in tree vs {} in arena", branches, self.branch_arena.len()),
            ));
        }
        Ok(())
    }

    /// Panic with the validation report if the tree is broken.
    #[cfg(feature = "testing")]
    pub(crate) fn assert_valid_after(&self, operation: &str) {
        if let Err(err) = self.validate() {
            panic!("tree invalid after {}: {}", operation, err);
        }
    }

    // ============================================================================
    // VALIDATION HELPERS FOR OPERATIONS
    // ============================================================================

    /// Insert with validation before and after the operation.
    pub fn try_insert(&mut self, key: K, value: V) -> ModifyResult<Option<V>> {
        self.validate().with_operation("insert")?;
        let old_value = self.insert(key, value);
        self.validate().with_operation("insert")?;
        Ok(old_value)
    }

    /// Remove with validation before and after the operation.
    ///
    /// Unlike `remove`, an absent key is an error.
    pub fn try_remove(&mut self, key: &K) -> ModifyResult<V> {
        self.validate().with_operation("remove")?;
        let removed = self.remove(key).ok_or(BPlusTreeError::KeyNotFound)?;
        self.validate().with_operation("remove")?;
        Ok(removed)
    }
}

/// Keys must be strictly increasing and inside `[lower, upper)`.
fn check_keys<K: Ord>(context: &str, keys: &[K], lower: Option<&K>, upper: Option<&K>) -> BTreeResult<()> {
    if let Some(i) = (1..keys.len()).find(|&i| keys[i - 1] >= keys[i]) {
        return Err(BPlusTreeError::data_integrity(
            context,
            &format!("keys out of order at index {}", i),
        ));
    }

    let (first, last) = match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(()),
    };
    if lower.map_or(false, |lower| first < lower) {
        return Err(BPlusTreeError::data_integrity(context, "first key below parent separator"));
    }
    if upper.map_or(false, |upper| last >= upper) {
        return Err(BPlusTreeError::data_integrity(context, "last key not below parent separator"));
    }
    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

impl<K: fmt::Debug, V: fmt::Debug> BPlusTreeMap<K, V> {
    /// Draw the tree, one node per line.
    ///
    /// Leaf lines read `[l:<size>] k=v ...`, branch lines `[i:<size>] k ...`,
    /// and children hang below their parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// for key in [10, 20, 30, 40, 25] {
    ///     tree.insert(key, key);
    /// }
    /// assert_eq!(
    ///     tree.render(),
    ///     "[i:2] 25\n├── [l:2] 10=10 20=20\n└── [l:3] 25=25 30=30 40=40\n"
    /// );
    /// ```
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: NodeRef<K, V>,
        prefix: &str,
        connector: &str,
    ) -> fmt::Result {
        write!(f, "{}{}", prefix, connector)?;
        match node {
            NodeRef::Leaf(id, _) => match self.get_leaf(id) {
                Some(leaf) => {
                    write!(f, "[l:{}]", leaf.keys.len())?;
                    for (key, value) in leaf.keys.iter().zip(&leaf.values) {
                        write!(f, " {:?}={:?}", key, value)?;
                    }
                    writeln!(f)
                }
                None => writeln!(f, "[l:?] <missing {}>", id),
            },
            NodeRef::Branch(id, _) => {
                let branch = match self.get_branch(id) {
                    Some(branch) => branch,
                    None => return writeln!(f, "[i:?] <missing {}>", id),
                };
                write!(f, "[i:{}]", branch.children.len())?;
                for key in &branch.keys {
                    write!(f, " {:?}", key)?;
                }
                writeln!(f)?;

                let child_prefix = match connector {
                    "├── " => format!("{}│   ", prefix),
                    "└── " => format!("{}    ", prefix),
                    _ => prefix.to_string(),
                };
                let last = branch.children.len().saturating_sub(1);
                for (i, child) in branch.children.iter().enumerate() {
                    let connector = if i == last { "└── " } else { "├── " };
                    self.fmt_node(f, *child, &child_prefix, connector)?;
                }
                Ok(())
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for BPlusTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            None => writeln!(f, "<empty>"),
            Some(root) => self.fmt_node(f, root, "", ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(order: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTreeMap<i32, i32> {
        let mut tree = BPlusTreeMap::new(order).unwrap();
        for key in keys {
            tree.insert(key, key);
        }
        tree
    }

    fn first_branch_id(tree: &BPlusTreeMap<i32, i32>) -> NodeId {
        match tree.root {
            Some(NodeRef::Branch(id, _)) => id,
            _ => panic!("expected a branch root"),
        }
    }

    #[test]
    fn test_valid_trees() {
        assert!(tree_with(4, []).check_invariants());
        assert!(tree_with(4, [1]).check_invariants());
        assert_eq!(tree_with(7, 0..500).validate(), Ok(()));
    }

    #[test]
    fn test_detects_wrong_length_counter() {
        let mut tree = tree_with(4, 0..20);
        tree.len += 1;
        let err = tree.validate().unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("Length counter"));
    }

    #[test]
    fn test_detects_unordered_leaf() {
        let mut tree = tree_with(4, 0..20);
        let leaf_id = tree.get_first_leaf_id().unwrap();
        tree.get_leaf_mut(leaf_id).unwrap().keys.swap(0, 1);
        assert!(!tree.check_invariants());
    }

    #[test]
    fn test_detects_key_outside_separator_bounds() {
        let mut tree = tree_with(4, [10, 20, 30, 40, 25]);
        let branch_id = first_branch_id(&tree);
        tree.get_branch_mut(branch_id).unwrap().keys[0] = 35;
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("parent separator"));
    }

    #[test]
    fn test_detects_broken_leaf_chain() {
        let mut tree = tree_with(4, 0..20);
        let leaf_id = tree.get_first_leaf_id().unwrap();
        tree.get_leaf_mut(leaf_id).unwrap().next = NULL_NODE;
        let err = tree.validate().unwrap_err();
        assert!(matches!(err, BPlusTreeError::CorruptedTree(_)));
    }

    #[test]
    fn test_detects_underfull_leaf() {
        let mut tree = tree_with(4, [10, 20, 30, 40, 25]);
        let leaf_id = tree.get_first_leaf_id().unwrap();
        let leaf = tree.get_leaf_mut(leaf_id).unwrap();
        leaf.keys.pop();
        leaf.values.pop();
        tree.len -= 1;
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("below minimum"));
    }

    #[test]
    fn test_detects_leaked_arena_slot() {
        let mut tree = tree_with(4, 0..10);
        tree.leaf_arena.allocate(Default::default());
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("Leaf arena"));
    }

    #[test]
    fn test_try_insert_and_try_remove() {
        let mut tree = tree_with(4, 0..10);
        assert_eq!(tree.try_insert(3, 33), Ok(Some(3)));
        assert_eq!(tree.try_insert(50, 50), Ok(None));
        assert_eq!(tree.try_remove(&3), Ok(33));
        assert_eq!(tree.try_remove(&3), Err(BPlusTreeError::KeyNotFound));
    }

    #[test]
    fn test_try_insert_reports_corruption() {
        let mut tree = tree_with(4, 0..10);
        tree.len = 0;
        let err = tree.try_insert(11, 11).unwrap_err();
        assert!(err.to_string().contains("Operation 'insert'"));
    }

    #[test]
    fn test_render_empty_and_single_leaf() {
        assert_eq!(tree_with(4, []).render(), "<empty>\n");
        assert_eq!(tree_with(4, [2, 1]).render(), "[l:2] 1=1 2=2\n");
    }

    #[test]
    fn test_render_nested_connectors() {
        let tree = tree_with(4, 0..12);
        let rendered = tree.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), tree.leaf_count() + tree.count_nodes_in_tree().1);
        assert!(lines[0].starts_with("[i:"));
        assert!(lines.iter().skip(1).all(|line| line.contains("── ")));
        assert!(lines.iter().any(|line| line.starts_with("│   ") || line.starts_with("    ")));
        assert!(lines.last().unwrap().contains("11=11"));
    }
}
