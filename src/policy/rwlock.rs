use std::sync::{Arc, RwLock};

use super::ListPolicy;
use crate::{Result, SortedList};

/// A list behind a reader-writer lock.
///
/// `member` takes the lock in shared mode and may run alongside other
/// members. `insert`, `delete` and `clear` take it exclusively.
#[derive(Clone, Default)]
pub struct RwLockList(Arc<RwLock<SortedList>>);

impl RwLockList {
    /// Creates an empty list.
    pub fn new() -> RwLockList {
        RwLockList::default()
    }

    /// Wraps an existing list.
    pub fn from_list(list: SortedList) -> RwLockList {
        RwLockList(Arc::new(RwLock::new(list)))
    }
}

impl ListPolicy for RwLockList {
    fn member(&self, value: u32) -> Result<bool> {
        Ok(self.0.read()?.member(value))
    }

    fn insert(&self, value: u32) -> Result<bool> {
        self.0.write()?.insert(value)
    }

    fn delete(&self, value: u32) -> Result<bool> {
        Ok(self.0.write()?.delete(value))
    }

    fn clear(&self) -> Result<()> {
        self.0.write()?.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.0.read()?.len())
    }

    fn values(&self) -> Result<Vec<u32>> {
        Ok(self.0.read()?.iter().collect())
    }
}
