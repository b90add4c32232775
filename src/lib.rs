#![deny(missing_docs)]
//! Benchmarks a shared sorted linked list under a randomized mix of Member,
//! Insert and Delete operations, with no locking, one mutex, or a
//! reader-writer lock.

#[macro_use]
extern crate log;

pub use config::BenchmarkConfig;
pub use error::{ListBenchError, Result};
pub use list::{SortedList, MAX_VALUE};
pub use policy::{ListPolicy, MutexList, PolicyKind, RwLockList, SerialList};
pub use runner::{drive, partition, populate, BenchmarkRunner, Phase, TimingResult};
pub use workload::{Mix, Operation, SourceMode, Workload};

mod config;
mod error;
pub mod list;
pub mod policy;
pub mod prompt;
pub mod report;
mod runner;
pub mod spawner;
pub mod workload;
