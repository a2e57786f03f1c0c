//! The key-value container contract shared by the tree and reference maps.
//!
//! Tests and benchmarks drive any `Container` through the same scenario, so
//! the B+ tree can be checked and measured against `std::collections::BTreeMap`.

use crate::types::BPlusTreeMap;
use std::collections::BTreeMap;

/// Minimal ordered key-value container.
pub trait Container<K, V> {
    /// Insert or overwrite. Returns the previous value for `key`, if any.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn search(&self, key: &K) -> Option<&V>;

    /// Remove `key`, returning its value. Absent keys are a no-op.
    fn delete(&mut self, key: &K) -> Option<V>;

    fn length(&self) -> usize;
}

impl<K: Ord + Clone, V> Container<K, V> for BPlusTreeMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BPlusTreeMap::insert(self, key, value)
    }

    fn search(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn length(&self) -> usize {
        self.len()
    }
}

impl<K: Ord, V> Container<K, V> for BTreeMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    fn search(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn length(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<C: Container<u32, u32>>(container: &mut C) -> Vec<Option<u32>> {
        let mut seen = Vec::new();
        for key in [5, 1, 9, 3] {
            seen.push(container.insert(key, key + 100));
        }
        seen.push(container.insert(9, 0));
        seen.push(container.delete(&1));
        seen.push(container.delete(&1));
        seen.push(container.search(&3).copied());
        seen.push(Some(container.length() as u32));
        seen
    }

    #[test]
    fn test_tree_and_btreemap_agree() {
        let mut tree = BPlusTreeMap::new(4).unwrap();
        let mut reference = BTreeMap::new();
        assert_eq!(exercise(&mut tree), exercise(&mut reference));
    }
}
