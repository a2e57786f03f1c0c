//! Iterator implementations for BPlusTreeMap.
//!
//! Every iterator walks the leaf chain: one descent to find the starting
//! leaf, then `next` links from leaf to leaf. No branch is revisited.

use crate::types::{BPlusTreeMap, LeafNode, NodeId, NULL_NODE};
use std::ops::{Bound, RangeBounds};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over key-value pairs in the B+ tree using the leaf linked list.
pub struct ItemIterator<'a, K, V> {
    tree: &'a BPlusTreeMap<K, V>,
    current_leaf_ref: Option<&'a LeafNode<K, V>>,
    current_leaf_index: usize,
}

/// Iterator over keys in the B+ tree.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over values in the B+ tree.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over the key-value pairs inside a key range.
pub struct RangeIterator<'a, K, V> {
    items: Option<ItemIterator<'a, K, V>>,
    end: Bound<K>,
}

// ============================================================================
// BPLUSTREE ITERATOR METHODS
// ============================================================================

impl<K, V> BPlusTreeMap<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self)
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator {
            items: self.items(),
        }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator {
            items: self.items(),
        }
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.get_leaf(self.get_first_leaf_id()?)?;
        Some((leaf.keys.first()?, leaf.values.first()?))
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.get_leaf(self.get_last_leaf_id()?)?;
        Some((leaf.keys.last()?, leaf.values.last()?))
    }
}

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Returns an iterator over key-value pairs in a range using Rust's range syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTreeMap;
    ///
    /// let mut tree = BPlusTreeMap::new(4).unwrap();
    /// for i in 0..10 {
    ///     tree.insert(i, i * 10);
    /// }
    ///
    /// let keys: Vec<_> = tree.range(3..7).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5, 6]);
    ///
    /// let keys: Vec<_> = tree.range(7..).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![7, 8, 9]);
    ///
    /// let values: Vec<_> = tree.range(..=2).map(|(_, v)| *v).collect();
    /// assert_eq!(values, vec![0, 10, 20]);
    /// ```
    pub fn range<R>(&self, range: R) -> RangeIterator<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        let items = match range.start_bound() {
            Bound::Unbounded => Some(self.items()),
            Bound::Included(start) => self.items_from(start, false),
            Bound::Excluded(start) => self.items_from(start, true),
        };

        RangeIterator {
            items,
            end: range.end_bound().cloned(),
        }
    }

    /// Position an iterator on the first key `>= start`, or `> start` if `exclusive`.
    fn items_from(&self, start: &K, exclusive: bool) -> Option<ItemIterator<'_, K, V>> {
        let leaf_id = self.find_leaf_id(start)?;
        let leaf = self.get_leaf(leaf_id)?;
        let index = if exclusive {
            leaf.keys.partition_point(|key| key <= start)
        } else {
            leaf.keys.partition_point(|key| key < start)
        };
        Some(ItemIterator::from_position(self, leaf_id, index))
    }
}

impl<'a, K, V> IntoIterator for &'a BPlusTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = ItemIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

// ============================================================================
// ITEMITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K, V> ItemIterator<'a, K, V> {
    pub fn new(tree: &'a BPlusTreeMap<K, V>) -> Self {
        Self {
            tree,
            current_leaf_ref: tree.get_first_leaf_id().and_then(|id| tree.get_leaf(id)),
            current_leaf_index: 0,
        }
    }

    /// Start at entry `index` of leaf `leaf_id`. An index past the end of the
    /// leaf continues with the next leaf.
    pub fn from_position(tree: &'a BPlusTreeMap<K, V>, leaf_id: NodeId, index: usize) -> Self {
        Self {
            tree,
            current_leaf_ref: tree.get_leaf(leaf_id),
            current_leaf_index: index,
        }
    }
}

impl<'a, K, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf_ref?;

            if self.current_leaf_index < leaf.keys.len() {
                let index = self.current_leaf_index;
                self.current_leaf_index += 1;
                return Some((&leaf.keys[index], &leaf.values[index]));
            }

            // Only arena access during iteration
            self.current_leaf_ref = if leaf.next == NULL_NODE {
                None
            } else {
                self.tree.get_leaf(leaf.next)
            };
            self.current_leaf_index = 0;
        }
    }
}

// ============================================================================
// KEYITERATOR / VALUEITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }
}

impl<'a, K, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}

// ============================================================================
// RANGEITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord, V> Iterator for RangeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.items.as_mut()?.next()?;

        let beyond_end = match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        };
        if beyond_end {
            self.items = None;
            return None;
        }

        Some((key, value))
    }
}
