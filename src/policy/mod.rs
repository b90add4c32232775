//! This module provides the concurrency disciplines a `SortedList` can be
//! driven under. All of them implement the `ListPolicy` trait.

use crate::workload::Operation;
use crate::Result;
use std::fmt;
use std::str::FromStr;

mod mutex;
mod rwlock;
mod serial;

pub use self::mutex::MutexList;
pub use self::rwlock::RwLockList;
pub use self::serial::SerialList;

/// Trait for a sorted list wrapped in a synchronization discipline.
///
/// Methods take `&self` so that a policy can hand out access through interior
/// mutability. Policies that may be shared with worker threads are also
/// `Clone + Send + Sync`, where cloning only copies a handle to the same list.
pub trait ListPolicy {
    /// Returns true if `value` is in the list.
    fn member(&self, value: u32) -> Result<bool>;

    /// Inserts `value`, returning `false` if it was already present.
    ///
    /// # Errors
    ///
    /// It returns `ListBenchError::Allocation` if no node could be allocated.
    /// The list is left unchanged and the lock, if any, is released.
    fn insert(&self, value: u32) -> Result<bool>;

    /// Removes `value`, returning `false` if it was not present.
    fn delete(&self, value: u32) -> Result<bool>;

    /// Releases every node.
    fn clear(&self) -> Result<()>;

    /// Returns the number of values in the list.
    fn len(&self) -> Result<usize>;

    /// Returns the values in ascending order.
    fn values(&self) -> Result<Vec<u32>>;

    /// Returns true if the list holds no values.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Applies one workload operation to the list.
    fn apply(&self, op: Operation, value: u32) -> Result<bool> {
        match op {
            Operation::Member => self.member(value),
            Operation::Insert => self.insert(value),
            Operation::Delete => self.delete(value),
        }
    }
}

/// Names the available disciplines.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// `SerialList`: no locking, single thread.
    Serial,
    /// `MutexList`: one exclusive lock.
    Mutex,
    /// `RwLockList`: shared lock for reads, exclusive for writes.
    RwLock,
}

impl PolicyKind {
    /// Every discipline, baseline first.
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Serial, PolicyKind::Mutex, PolicyKind::RwLock];

    /// Returns true if the discipline may be driven by several threads.
    pub fn is_concurrent(self) -> bool {
        self != PolicyKind::Serial
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PolicyKind::Serial => "serial",
            PolicyKind::Mutex => "mutex",
            PolicyKind::RwLock => "rwlock",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<PolicyKind, String> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(PolicyKind::Serial),
            "mutex" => Ok(PolicyKind::Mutex),
            "rwlock" => Ok(PolicyKind::RwLock),
            _ => Err(format!("unknown policy `{}`", s)),
        }
    }
}
