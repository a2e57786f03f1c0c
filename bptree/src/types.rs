//! Core types and data structures for BPlusTreeMap.
//!
//! This module contains the tree controller, both node kinds, the typed node
//! handle, and the result types that carry split and underflow information
//! back up the recursion.

use crate::compact_arena::CompactArena;
use std::marker::PhantomData;

pub use crate::compact_arena::{NodeId, NULL_NODE};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest supported order. Orders 2 and 3 cannot keep both halves of a
/// split at minimum occupancy.
pub const MIN_ORDER: usize = 4;

/// Order used by `BPlusTreeMap::default`.
pub const DEFAULT_ORDER: usize = 128;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Ordered map backed by an order-bounded B+ tree.
///
/// Every entry lives in a leaf; branches only hold separator keys that route
/// searches. All leaves sit at the same depth and every node other than the
/// root stays at least half full, so search, insert and remove each visit
/// `O(log n)` nodes.
///
/// The `order` is the maximum *size* of a node: the number of entries of a
/// leaf, or the number of children of a branch.
///
/// # Examples
///
/// ```
/// use bptree::BPlusTreeMap;
///
/// let mut tree = BPlusTreeMap::new(4).unwrap();
/// for key in [12, 6, 17, 21, 3] {
///     tree.insert(key, key * 2);
/// }
///
/// assert_eq!(tree.get(&17), Some(&34));
/// assert_eq!(tree.remove(&6), Some(12));
/// assert_eq!(tree.len(), 4);
/// assert!(tree.check_invariants());
/// ```
#[derive(Debug)]
pub struct BPlusTreeMap<K, V> {
    /// Maximum node size.
    pub(crate) order: usize,
    /// The root node, `None` while the tree is empty.
    pub(crate) root: Option<NodeRef<K, V>>,
    /// Number of entries stored in the leaves.
    pub(crate) len: usize,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<K, V>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: CompactArena<BranchNode<K, V>>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Maximum number of entries this node can hold.
    pub(crate) order: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// List of values corresponding to keys.
    pub(crate) values: Vec<V>,
    /// Right neighbour in the leaf chain.
    pub(crate) next: NodeId,
}

/// Internal (branch) node containing separator keys and child handles.
#[derive(Debug, Clone)]
pub struct BranchNode<K, V> {
    /// Maximum number of children this node can hold.
    pub(crate) order: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes, always one more than `keys`.
    pub(crate) children: Vec<NodeRef<K, V>>,
}

// ============================================================================
// ENUMS AND RESULT TYPES
// ============================================================================

/// Handle to a node in one of the tree's arenas.
#[derive(Debug, PartialEq, Eq)]
pub enum NodeRef<K, V> {
    Leaf(NodeId, PhantomData<(K, V)>),
    Branch(NodeId, PhantomData<(K, V)>),
}

impl<K, V> Clone for NodeRef<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<K, V> {}

impl<K, V> NodeRef<K, V> {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id, _) => id,
            NodeRef::Branch(id, _) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_, _))
    }

    pub(crate) fn leaf(id: NodeId) -> Self {
        NodeRef::Leaf(id, PhantomData)
    }

    pub(crate) fn branch(id: NodeId) -> Self {
        NodeRef::Branch(id, PhantomData)
    }
}

/// Node data produced by a split, not yet placed in an arena.
pub enum SplitNodeData<K, V> {
    Leaf(LeafNode<K, V>),
    Branch(BranchNode<K, V>),
}

/// Result of an insertion into a subtree.
pub enum InsertResult<K, V> {
    /// Insertion completed without splitting. Contains the old value if key existed.
    Updated(Option<V>),
    /// The subtree root split; the parent must adopt `new_node_data` to the
    /// right of the split node, routed by `separator_key`.
    Split {
        new_node_data: SplitNodeData<K, V>,
        separator_key: K,
    },
}

/// Result of a removal from a subtree.
pub enum RemoveResult<V> {
    /// Removal completed. Contains the removed value if key existed.
    /// The bool indicates if the subtree root is now underfull.
    Updated(Option<V>, bool),
}
