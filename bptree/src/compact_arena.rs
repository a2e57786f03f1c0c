//! Slot arena that owns every node of a tree.
//!
//! Each live slot is referenced from exactly one place (a parent branch or the
//! tree's root slot). Freed slots go on a free list and are reused by the next
//! allocation.

pub type NodeId = u32;
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
}

/// Arena storing items directly, with a free list and an allocation mask.
#[derive(Debug)]
pub struct CompactArena<T> {
    storage: Vec<T>,
    free_list: Vec<usize>,
    allocated_mask: Vec<bool>,
    allocated: usize,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
            allocated: 0,
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };
        self.allocated += 1;

        match NodeId::try_from(index) {
            Ok(id) if id != NULL_NODE => id,
            _ => panic!("arena exhausted: slot {} does not fit in a NodeId", index),
        }
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.live_index(id)?;

        self.allocated_mask[index] = false;
        self.free_list.push(index);
        self.allocated -= 1;

        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live_index(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.live_index(id)?;
        Some(&mut self.storage[index])
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let total_capacity = self.storage.capacity();
        let utilization = if total_capacity > 0 {
            self.allocated as f64 / total_capacity as f64
        } else {
            0.0
        };

        CompactArenaStats {
            total_capacity,
            allocated_count: self.allocated,
            free_count: self.free_list.len(),
            utilization,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
        self.allocated = 0;
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_arena_basic_operations() {
        let mut arena = CompactArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);
        let id3 = arena.allocate(126);

        assert_eq!(arena.get(id1), Some(&42));
        assert_eq!(arena.get(id2), Some(&84));
        assert_eq!(arena.get(id3), Some(&126));

        assert!(arena.contains(id1));
        assert!(!arena.contains(NULL_NODE));

        let stats = arena.stats();
        assert_eq!(stats.allocated_count, 3);
        assert_eq!(stats.free_count, 0);
    }

    #[test]
    fn test_deallocate_recycles_slot() {
        let mut arena: CompactArena<i32> = CompactArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);

        assert_eq!(arena.deallocate(id1), Some(42));
        assert!(!arena.contains(id1));
        assert!(arena.contains(id2));
        assert_eq!(arena.free_count(), 1);

        // Double free is refused
        assert_eq!(arena.deallocate(id1), None);

        let id3 = arena.allocate(168);
        assert_eq!(id3, id1);
        assert_eq!(arena.get(id3), Some(&168));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.free_count(), 0);
    }

    #[test]
    fn test_get_mut_and_clear() {
        let mut arena = CompactArena::new();
        let id = arena.allocate(String::from("left"));
        if let Some(item) = arena.get_mut(id) {
            item.push_str("-merged");
        }
        assert_eq!(arena.get(id).map(String::as_str), Some("left-merged"));

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(id), None);
    }
}
