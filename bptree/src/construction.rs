//! Construction and initialization logic for BPlusTreeMap and nodes.
//!
//! The order is the only configuration a tree takes. It is validated here,
//! once, and never changes afterwards.

use crate::compact_arena::CompactArena;
use crate::error::{BPlusTreeError, BTreeResult, InitResult};
use crate::types::{
    BPlusTreeMap, BranchNode, LeafNode, NodeId, DEFAULT_ORDER, MIN_ORDER, NULL_NODE,
};

impl<K, V> BPlusTreeMap<K, V> {
    /// Create an empty B+ tree with the given order.
    ///
    /// # Arguments
    ///
    /// * `order` - Maximum node size (minimum 4)
    ///
    /// # Returns
    ///
    /// Returns `Ok(BPlusTreeMap)` if the order is valid, `Err(BPlusTreeError)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let tree = BPlusTreeMap::<i32, String>::new(16).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusTreeMap::<i32, String>::new(3).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        validation::validate_order(order)?;

        Ok(Self {
            order,
            root: None,
            len: 0,
            leaf_arena: CompactArena::new(),
            branch_arena: CompactArena::new(),
        })
    }

    /// Create a B+ tree with the default order.
    ///
    /// This is equivalent to calling `new(DEFAULT_ORDER)`.
    pub fn with_default_order() -> InitResult<Self> {
        Self::new(DEFAULT_ORDER)
    }

    /// The order this tree was built with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Minimum size of every non-root node.
    pub(crate) fn half(&self) -> usize {
        (self.order + 1) / 2
    }

    /// Largest sibling size that can absorb an underflowing node without
    /// exceeding the order.
    pub(crate) fn merge_threshold(&self) -> usize {
        self.order - self.half() + 1
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates a new empty leaf node for a tree of the given order.
    pub fn new(order: usize) -> Self {
        // One spare slot: a leaf briefly holds order + 1 entries before splitting
        Self {
            order,
            keys: Vec::with_capacity(order + 1),
            values: Vec::with_capacity(order + 1),
            next: NULL_NODE,
        }
    }

    /// Creates a leaf holding the given entries.
    pub(crate) fn from_parts(order: usize, keys: Vec<K>, values: Vec<V>, next: NodeId) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self {
            order,
            keys,
            values,
            next,
        }
    }
}

impl<K, V> BranchNode<K, V> {
    /// Creates a new empty branch node for a tree of the given order.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            keys: Vec::with_capacity(order),
            children: Vec::with_capacity(order + 1),
        }
    }
}

// Default implementations
impl<K, V> Default for BPlusTreeMap<K, V> {
    /// Create a B+ tree with the default order.
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            root: None,
            len: 0,
            leaf_arena: CompactArena::new(),
            branch_arena: CompactArena::new(),
        }
    }
}

// Empty placeholders left behind in freed arena slots; nothing is reserved.
impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self {
            order: 0,
            keys: Vec::new(),
            values: Vec::new(),
            next: NULL_NODE,
        }
    }
}

impl<K, V> Default for BranchNode<K, V> {
    fn default() -> Self {
        Self {
            order: 0,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that an order is supported.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if valid, `Err(BPlusTreeError::InvalidOrder)` otherwise.
    pub fn validate_order(order: usize) -> BTreeResult<()> {
        if order < MIN_ORDER {
            Err(BPlusTreeError::invalid_order(order, MIN_ORDER))
        } else {
            Ok(())
        }
    }

    /// Get the recommended order for a given expected number of elements.
    ///
    /// Small trees favour narrow nodes, large trees favour shallow ones.
    /// The result is always `>= MIN_ORDER`.
    pub fn recommended_order(expected_elements: usize) -> usize {
        if expected_elements < 100 {
            8
        } else if expected_elements < 10_000 {
            32
        } else if expected_elements < 1_000_000 {
            64
        } else {
            DEFAULT_ORDER
        }
    }
}
