//! GET operations for BPlusTreeMap.
//!
//! This module contains the read operations for the B+ tree, including key
//! lookup, value retrieval, and the arena accessors every other module uses.

use crate::error::{BPlusTreeError, KeyResult};
use crate::types::{BPlusTreeMap, BranchNode, LeafNode, NodeId, NodeRef};

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.get(&1), Some(&"one"));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let leaf_id = self.find_leaf_id(key)?;
        self.get_leaf(leaf_id)?.get(key)
    }

    /// Check if key exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Get value for a key, returning an error if the key doesn't exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::{BPlusTreeError, BPlusTreeMap};
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.get_item(&1), Ok(&"one"));
    /// assert_eq!(tree.get_item(&2), Err(BPlusTreeError::KeyNotFound));
    /// ```
    pub fn get_item(&self, key: &K) -> KeyResult<&V> {
        self.get(key).ok_or(BPlusTreeError::KeyNotFound)
    }

    /// Get a mutable reference to the value for a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// tree.insert(1, "one");
    /// if let Some(value) = tree.get_mut(&1) {
    ///     *value = "ONE";
    /// }
    /// assert_eq!(tree.get(&1), Some(&"ONE"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf_id = self.find_leaf_id(key)?;
        self.get_leaf_mut(leaf_id)?.get_mut(key)
    }

    // ============================================================================
    // NAVIGATION HELPERS
    // ============================================================================

    /// Descend from the root to the leaf whose key range covers `key`.
    pub(crate) fn find_leaf_id(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root?;

        loop {
            match current {
                NodeRef::Leaf(id, _) => return Some(id),
                NodeRef::Branch(id, _) => {
                    current = *self.get_branch(id)?.get_child(key)?;
                }
            }
        }
    }
}

impl<K, V> BPlusTreeMap<K, V> {
    // ============================================================================
    // ARENA ACCESS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    #[inline]
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Get a mutable reference to a leaf node in the arena.
    #[inline]
    pub fn get_leaf_mut(&mut self, id: NodeId) -> Option<&mut LeafNode<K, V>> {
        self.leaf_arena.get_mut(id)
    }

    /// Get a reference to a branch node in the arena.
    #[inline]
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K, V>> {
        self.branch_arena.get(id)
    }

    /// Get a mutable reference to a branch node in the arena.
    #[inline]
    pub fn get_branch_mut(&mut self, id: NodeId) -> Option<&mut BranchNode<K, V>> {
        self.branch_arena.get_mut(id)
    }

    // Accessors for ids taken from a live path. A miss means the tree
    // structure itself is broken, so these panic instead of returning None.

    pub(crate) fn expect_leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match self.leaf_arena.get(id) {
            Some(leaf) => leaf,
            None => panic!("leaf {} is referenced by the tree but not allocated", id),
        }
    }

    pub(crate) fn expect_leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match self.leaf_arena.get_mut(id) {
            Some(leaf) => leaf,
            None => panic!("leaf {} is referenced by the tree but not allocated", id),
        }
    }

    pub(crate) fn expect_branch(&self, id: NodeId) -> &BranchNode<K, V> {
        match self.branch_arena.get(id) {
            Some(branch) => branch,
            None => panic!("branch {} is referenced by the tree but not allocated", id),
        }
    }

    pub(crate) fn expect_branch_mut(&mut self, id: NodeId) -> &mut BranchNode<K, V> {
        match self.branch_arena.get_mut(id) {
            Some(branch) => branch,
            None => panic!("branch {} is referenced by the tree but not allocated", id),
        }
    }
}
