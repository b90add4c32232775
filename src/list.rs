//! The sorted linked list every benchmark operates on.

use crate::{ListBenchError, Result};

/// Exclusive upper bound of the values a `SortedList` accepts (2^16).
pub const MAX_VALUE: u32 = 65536;

struct Node {
    value: u32,
    // successor while linked, next free slot once released
    next: Option<usize>,
}

/// A sorted singly-linked list of unique integers in `[0, MAX_VALUE)`.
///
/// Nodes live in an arena and link to each other by slot index. A deleted
/// node's slot is pushed onto a free-list threaded through the same `next`
/// field, so every slot is owned by exactly one chain: the list or the
/// free-list.
///
/// Every operation walks the chain from the head in ascending order and stops
/// at the first node whose value is not less than the target, so its cost
/// grows with the rank of the target among the current elements.
///
/// ```rust
/// use listbench::SortedList;
/// # fn try_main() -> listbench::Result<()> {
/// let mut list = SortedList::new();
/// assert!(list.insert(7)?);
/// assert!(!list.insert(7)?);
/// assert!(list.member(7));
/// assert!(list.delete(7));
/// assert!(list.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SortedList {
    nodes: Vec<Node>,
    head: Option<usize>,
    free: Option<usize>,
    len: usize,
    // upper bound on arena slots, `None` means grow until the allocator refuses
    limit: Option<usize>,
}

impl SortedList {
    /// Creates an empty list.
    pub fn new() -> SortedList {
        SortedList::default()
    }

    /// Creates an empty list that never holds more than `limit` nodes.
    ///
    /// An insert that would need a node beyond the limit fails with
    /// `ListBenchError::Allocation`, the same way an allocator failure does.
    pub fn with_capacity_limit(limit: usize) -> SortedList {
        SortedList {
            limit: Some(limit),
            ..SortedList::default()
        }
    }

    /// Returns the number of values in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns true if `value` is in the list.
    pub fn member(&self, value: u32) -> bool {
        let (_, curr) = self.locate(value);
        self.holds(curr, value)
    }

    /// Inserts `value`, returning `false` if it was already present.
    ///
    /// # Errors
    ///
    /// It returns `ListBenchError::ValueOutOfRange` for values not below
    /// `MAX_VALUE` and `ListBenchError::Allocation` if no node could be
    /// allocated. The list is left untouched in both cases.
    pub fn insert(&mut self, value: u32) -> Result<bool> {
        if value >= MAX_VALUE {
            return Err(ListBenchError::ValueOutOfRange { value });
        }
        let (pred, curr) = self.locate(value);
        if self.holds(curr, value) {
            return Ok(false);
        }
        let slot = self.allocate(Node { value, next: curr })?;
        self.link_after(pred, Some(slot));
        self.len += 1;
        Ok(true)
    }

    /// Removes `value`, returning `false` if it was not present.
    pub fn delete(&mut self, value: u32) -> bool {
        let (pred, curr) = self.locate(value);
        if !self.holds(curr, value) {
            return false;
        }
        if let Some(slot) = curr {
            let next = self.nodes[slot].next;
            self.link_after(pred, next);
            self.release(slot);
            self.len -= 1;
        }
        true
    }

    /// Releases every node and resets the list to empty.
    pub fn clear(&mut self) {
        // 直接换掉整个 arena，内存一并归还
        self.nodes = Vec::new();
        self.head = None;
        self.free = None;
        self.len = 0;
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            curr: self.head,
        }
    }

    // Returns (predecessor, first node with value >= target).
    fn locate(&self, value: u32) -> (Option<usize>, Option<usize>) {
        let mut pred = None;
        let mut curr = self.head;
        while let Some(slot) = curr {
            let node = &self.nodes[slot];
            if node.value >= value {
                break;
            }
            pred = curr;
            curr = node.next;
        }
        (pred, curr)
    }

    fn holds(&self, slot: Option<usize>, value: u32) -> bool {
        match slot {
            Some(slot) => self.nodes[slot].value == value,
            None => false,
        }
    }

    fn link_after(&mut self, pred: Option<usize>, next: Option<usize>) {
        match pred {
            None => self.head = next,
            Some(pred) => self.nodes[pred].next = next,
        }
    }

    fn allocate(&mut self, node: Node) -> Result<usize> {
        if let Some(slot) = self.free {
            self.free = self.nodes[slot].next;
            self.nodes[slot] = node;
            return Ok(slot);
        }
        if let Some(limit) = self.limit {
            if self.nodes.len() >= limit {
                return Err(ListBenchError::Allocation);
            }
        }
        self.nodes
            .try_reserve(1)
            .map_err(|_| ListBenchError::Allocation)?;
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    fn release(&mut self, slot: usize) {
        self.nodes[slot].next = self.free;
        self.free = Some(slot);
    }
}

/// Ascending iterator over the values of a `SortedList`.
pub struct Iter<'a> {
    list: &'a SortedList,
    curr: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let slot = self.curr?;
        let node = &self.list.nodes[slot];
        self.curr = node.next;
        Some(node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_slots_are_reused() {
        let mut list = SortedList::new();
        for v in &[5, 1, 9] {
            assert!(list.insert(*v).unwrap());
        }
        assert!(list.delete(5));
        assert!(list.insert(3).unwrap());
        assert_eq!(list.nodes.len(), 3);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 3, 9]);
    }

    #[test]
    fn capacity_limit_counts_free_slots() {
        let mut list = SortedList::with_capacity_limit(2);
        assert!(list.insert(10).unwrap());
        assert!(list.insert(20).unwrap());
        match list.insert(15) {
            Err(ListBenchError::Allocation) => {}
            other => panic!("expected allocation failure, got {:?}", other),
        }
        assert!(list.delete(10));
        assert!(list.insert(15).unwrap());
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![15, 20]);
    }

    #[test]
    fn clear_drops_the_arena() {
        let mut list = SortedList::new();
        for v in 0..100 {
            list.insert(v).unwrap();
        }
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.nodes.capacity(), 0);
        assert!(list.free.is_none());
    }
}
