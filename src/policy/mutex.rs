use std::sync::{Arc, Mutex};

use super::ListPolicy;
use crate::{Result, SortedList};

/// A list behind one coarse-grained `Mutex`.
///
/// Every operation, reads included, holds the lock for its whole traversal,
/// so all operations from all workers are totally ordered.
#[derive(Clone, Default)]
pub struct MutexList(Arc<Mutex<SortedList>>);

impl MutexList {
    /// Creates an empty list.
    pub fn new() -> MutexList {
        MutexList::default()
    }

    /// Wraps an existing list.
    pub fn from_list(list: SortedList) -> MutexList {
        MutexList(Arc::new(Mutex::new(list)))
    }
}

impl ListPolicy for MutexList {
    fn member(&self, value: u32) -> Result<bool> {
        Ok(self.0.lock()?.member(value))
    }

    fn insert(&self, value: u32) -> Result<bool> {
        // guard 在出错返回时同样会被 drop，锁不会泄漏
        self.0.lock()?.insert(value)
    }

    fn delete(&self, value: u32) -> Result<bool> {
        Ok(self.0.lock()?.delete(value))
    }

    fn clear(&self) -> Result<()> {
        self.0.lock()?.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.0.lock()?.len())
    }

    fn values(&self) -> Result<Vec<u32>> {
        Ok(self.0.lock()?.iter().collect())
    }
}
