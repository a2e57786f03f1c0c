//! Order-bounded B+ tree map.
//!
//! `BPlusTreeMap` stores every entry in its leaves and keeps only separator
//! keys in branch nodes. Nodes live in two slot arenas and refer to one
//! another by id. A node overflowing its order splits in two; a node
//! falling below half its order either merges with a sibling or receives a
//! batch of entries from it in a single transfer.
//!
//! ```
//! use bptree::BPlusTreeMap;
//!
//! let mut tree = BPlusTreeMap::new(4).unwrap();
//! for key in [12, 6, 17, 21, 3, 7, 9, 26, 25, 19] {
//!     tree.insert(key, key * 2);
//! }
//! assert_eq!(tree.len(), 10);
//! assert_eq!(tree.remove(&21), Some(42));
//! assert_eq!(tree.get(&21), None);
//!
//! let keys: Vec<_> = tree.keys().copied().collect();
//! assert_eq!(keys, vec![3, 6, 7, 9, 12, 17, 19, 25, 26]);
//! assert!(tree.check_invariants());
//! ```
//!
//! Structural changes are reported as `tracing` events at `trace` level.

mod compact_arena;
mod construction;
mod container;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::validation::{recommended_order, validate_order};
pub use container::Container;
pub use error::{
    BPlusTreeError, BTreeResult, BTreeResultExt, InitResult, KeyResult, ModifyResult,
};
pub use iteration::{ItemIterator, KeyIterator, RangeIterator, ValueIterator};
pub use types::{
    BPlusTreeMap, BranchNode, LeafNode, NodeId, NodeRef, DEFAULT_ORDER, MIN_ORDER, NULL_NODE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_surface_round_trip() {
        let mut tree = BPlusTreeMap::new(recommended_order(50)).unwrap();
        for i in 0..50 {
            assert_eq!(tree.insert(i, i.to_string()), None);
        }
        assert_eq!(tree.len(), 50);
        assert_eq!(tree.get(&42).map(String::as_str), Some("42"));

        for i in (0..50).step_by(2) {
            assert_eq!(tree.remove(&i), Some(i.to_string()));
        }
        assert_eq!(tree.len(), 25);
        assert!(tree.keys().all(|k| k % 2 == 1));
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BPlusTreeMap<u64, String>>();
    }

    #[test]
    fn test_order_below_minimum_is_rejected() {
        let err = BPlusTreeMap::<u8, u8>::new(MIN_ORDER - 1).unwrap_err();
        assert!(err.is_order_error());
        assert!(validate_order(MIN_ORDER).is_ok());
    }
}
