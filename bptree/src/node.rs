//! Node implementations for BPlusTreeMap.
//!
//! This module contains the node-level halves of every tree operation:
//! lookup, sorted insertion, splitting, removal, merging, and the donor and
//! recipient sides of a batch transfer. Nothing here touches the arenas;
//! the tree-level modules wire the results together.

use crate::types::{InsertResult, LeafNode, BranchNode, NodeRef, SplitNodeData, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Clone, V> LeafNode<K, V> {
    // ============================================================================
    // GET OPERATIONS
    // ============================================================================

    /// Get a value by key from this leaf node.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Get a mutable reference to a value by key from this leaf node.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &mut self.values[index])
    }

    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Get a reference to the keys in this leaf node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Get a reference to the values in this leaf node.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a key-value pair, splitting this leaf if it overflows.
    pub fn insert(&mut self, key: K, value: V) -> InsertResult<K, V> {
        match self.keys.binary_search(&key) {
            Ok(index) => {
                let old_value = std::mem::replace(&mut self.values[index], value);
                InsertResult::Updated(Some(old_value))
            }
            Err(index) => {
                self.keys.insert(index, key);
                self.values.insert(index, value);
                if !self.is_overfull() {
                    return InsertResult::Updated(None);
                }

                let new_right = self.split();
                let separator_key = new_right.keys[0].clone();

                InsertResult::Split {
                    new_node_data: SplitNodeData::Leaf(new_right),
                    separator_key,
                }
            }
        }
    }

    /// Split an overfull leaf, returning the new right node.
    ///
    /// The left keeps `(order + 1) / 2` entries. The right takes over this
    /// leaf's `next` link; the caller links this leaf to the right once the
    /// right has an id.
    pub fn split(&mut self) -> LeafNode<K, V> {
        let mid = self.keys.len() / 2;

        let right_keys = self.keys.split_off(mid);
        let right_values = self.values.split_off(mid);
        let new_right = LeafNode::from_parts(self.order, right_keys, right_values, self.next);
        self.next = NULL_NODE;

        new_right
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Remove a key-value pair from this leaf node.
    /// Returns the removed value if the key existed, and whether the node is now underfull.
    pub fn remove(&mut self, key: &K) -> (Option<V>, bool) {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                let removed_value = self.values.remove(index);
                (Some(removed_value), self.is_underfull())
            }
            Err(_) => (None, false),
        }
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Node size used for capacity checks: the number of entries.
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf node is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if this leaf holds more entries than its order allows.
    pub fn is_overfull(&self) -> bool {
        self.size() > self.order
    }

    /// Returns true if this leaf node is below minimum occupancy.
    pub fn is_underfull(&self) -> bool {
        self.size() < self.min_size()
    }

    /// Minimum size of a non-root leaf.
    pub fn min_size(&self) -> usize {
        (self.order + 1) / 2
    }

    // ============================================================================
    // MERGING AND TRANSFER HELPERS
    // ============================================================================

    /// Absorb every entry of the right sibling, taking over its `next` link.
    pub fn merge_from(&mut self, mut right: LeafNode<K, V>) {
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.next = right.next;
    }

    /// Donor side of a transfer to the left sibling: remove the first `count` entries.
    pub fn pop_front(&mut self, count: usize) -> (Vec<K>, Vec<V>) {
        assert!(
            count <= self.len(),
            "leaf transfer of {} entries from a leaf holding {}",
            count,
            self.len()
        );
        let keys = self.keys.drain(..count).collect();
        let values = self.values.drain(..count).collect();
        (keys, values)
    }

    /// Donor side of a transfer to the right sibling: remove the last `count` entries.
    pub fn pop_back(&mut self, count: usize) -> (Vec<K>, Vec<V>) {
        assert!(
            count <= self.len(),
            "leaf transfer of {} entries from a leaf holding {}",
            count,
            self.len()
        );
        let at = self.len() - count;
        (self.keys.split_off(at), self.values.split_off(at))
    }

    /// Recipient side of a transfer from the right sibling.
    pub fn append_entries(&mut self, keys: Vec<K>, values: Vec<V>) {
        self.keys.extend(keys);
        self.values.extend(values);
    }

    /// Recipient side of a transfer from the left sibling. Returns the new
    /// separator between the two siblings.
    pub fn prepend_entries(&mut self, keys: Vec<K>, values: Vec<V>) -> K {
        self.keys.splice(0..0, keys);
        self.values.splice(0..0, values);
        self.keys[0].clone()
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Clone, V> BranchNode<K, V> {
    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Adopt a child produced by splitting `children[child_index]`.
    ///
    /// Returns None if no split needed, or Some((new_branch, promoted_key))
    /// if this branch overflowed. The caller places the new branch in the arena.
    ///
    /// # Panics
    ///
    /// Panics if `separator_key` is already a separator of this branch.
    pub fn insert_child_and_split_if_needed(
        &mut self,
        child_index: usize,
        separator_key: K,
        new_child: NodeRef<K, V>,
    ) -> Option<(BranchNode<K, V>, K)> {
        let index = match self.keys.binary_search(&separator_key) {
            Ok(existing) => panic!(
                "duplicate separator inserted into branch at key index {} (child {})",
                existing, child_index
            ),
            Err(index) => index,
        };
        debug_assert_eq!(index, child_index, "separator routed to a foreign child");

        self.keys.insert(index, separator_key);
        self.children.insert(index + 1, new_child);

        if self.is_overfull() {
            Some(self.split_data())
        } else {
            None
        }
    }

    /// Split an overfull branch, returning the new right node and the promoted key.
    ///
    /// The middle key moves up and is kept by neither half.
    pub fn split_data(&mut self) -> (BranchNode<K, V>, K) {
        let mid = self.keys.len() / 2;

        let mut right_keys = self.keys.split_off(mid);
        let promoted_key = right_keys.remove(0);
        let right_children = self.children.split_off(mid + 1);

        let new_right = BranchNode {
            order: self.order,
            keys: right_keys,
            children: right_children,
        };

        (new_right, promoted_key)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Node size used for capacity checks: the number of children.
    pub fn size(&self) -> usize {
        self.children.len()
    }

    /// Returns true if this branch node holds no separators.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if this branch has more children than its order allows.
    pub fn is_overfull(&self) -> bool {
        self.size() > self.order
    }

    /// Returns true if this branch node is below minimum occupancy.
    pub fn is_underfull(&self) -> bool {
        self.size() < self.min_size()
    }

    /// Minimum size of a non-root branch.
    pub fn min_size(&self) -> usize {
        (self.order + 1) / 2
    }

    /// Returns the number of separator keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    // ============================================================================
    // NAVIGATION
    // ============================================================================

    /// Find the index of the child that should contain the given key.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Get the child node for a given key.
    pub fn get_child(&self, key: &K) -> Option<&NodeRef<K, V>> {
        self.children.get(self.find_child_index(key))
    }

    // ============================================================================
    // MERGING AND TRANSFER HELPERS
    // ============================================================================

    /// Remove the separator at `key_index` together with the child to its right.
    pub fn remove_separator(&mut self, key_index: usize) -> (K, NodeRef<K, V>) {
        let separator = self.keys.remove(key_index);
        let child = self.children.remove(key_index + 1);
        (separator, child)
    }

    /// Merge all content from the right sibling into this one, with the separator from the parent.
    pub fn merge_from(&mut self, separator: K, mut right: BranchNode<K, V>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }

    /// Donor side of a transfer to the left sibling: remove the first
    /// `count` children and the `count` keys that follow them.
    pub fn pop_front(&mut self, count: usize) -> (Vec<K>, Vec<NodeRef<K, V>>) {
        assert!(
            count <= self.len(),
            "branch transfer of {} children from a branch holding {} keys",
            count,
            self.len()
        );
        let keys = self.keys.drain(..count).collect();
        let children = self.children.drain(..count).collect();
        (keys, children)
    }

    /// Donor side of a transfer to the right sibling: remove the last
    /// `count` children and the `count` keys that precede them.
    pub fn pop_back(&mut self, count: usize) -> (Vec<K>, Vec<NodeRef<K, V>>) {
        assert!(
            count <= self.len(),
            "branch transfer of {} children from a branch holding {} keys",
            count,
            self.len()
        );
        let keys = self.keys.split_off(self.keys.len() - count);
        let children = self.children.split_off(self.children.len() - count);
        (keys, children)
    }

    /// Recipient side of a transfer from the right sibling.
    ///
    /// The parent separator comes down in front of the moved block and the
    /// last moved key goes up as the new separator, which is returned.
    pub fn append_from_right(
        &mut self,
        separator: K,
        mut keys: Vec<K>,
        children: Vec<NodeRef<K, V>>,
    ) -> K {
        debug_assert_eq!(keys.len(), children.len());
        let new_separator = keys.remove(keys.len() - 1);
        self.keys.push(separator);
        self.keys.extend(keys);
        self.children.extend(children);
        new_separator
    }

    /// Recipient side of a transfer from the left sibling.
    ///
    /// The parent separator comes down behind the moved block and the first
    /// moved key goes up as the new separator, which is returned.
    pub fn prepend_from_left(
        &mut self,
        separator: K,
        mut keys: Vec<K>,
        children: Vec<NodeRef<K, V>>,
    ) -> K {
        debug_assert_eq!(keys.len(), children.len());
        let new_separator = keys.remove(0);
        keys.push(separator);
        self.keys.splice(0..0, keys);
        self.children.splice(0..0, children);
        new_separator
    }
}
