use std::cell::RefCell;

use super::ListPolicy;
use crate::{Result, SortedList};

/// A list with no synchronization at all.
///
/// This is the sequential baseline. The `RefCell` makes the type `!Sync`, so
/// it cannot be shared with worker threads in the first place.
#[derive(Default)]
pub struct SerialList(RefCell<SortedList>);

impl SerialList {
    /// Creates an empty list.
    pub fn new() -> SerialList {
        SerialList::default()
    }

    /// Wraps an existing list.
    pub fn from_list(list: SortedList) -> SerialList {
        SerialList(RefCell::new(list))
    }
}

impl ListPolicy for SerialList {
    fn member(&self, value: u32) -> Result<bool> {
        Ok(self.0.borrow().member(value))
    }

    fn insert(&self, value: u32) -> Result<bool> {
        self.0.borrow_mut().insert(value)
    }

    fn delete(&self, value: u32) -> Result<bool> {
        Ok(self.0.borrow_mut().delete(value))
    }

    fn clear(&self) -> Result<()> {
        self.0.borrow_mut().clear();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.0.borrow().len())
    }

    fn values(&self) -> Result<Vec<u32>> {
        Ok(self.0.borrow().iter().collect())
    }
}
