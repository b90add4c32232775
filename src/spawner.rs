//! This module starts benchmark workers. The runner never reuses a worker
//! across trials: every trial asks its `WorkerSpawner` for a fresh batch.

use std::thread::{self, JoinHandle};

use crate::{ListBenchError, Result};

/// Per-kind tallies of the operations one worker performed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OpCounts {
    /// `Member` calls.
    pub members: u64,
    /// `Member` calls that found their value.
    pub hits: u64,
    /// `Insert` calls.
    pub inserts: u64,
    /// `Insert` calls that added a value.
    pub inserted: u64,
    /// `Delete` calls.
    pub deletes: u64,
    /// `Delete` calls that removed a value.
    pub deleted: u64,
}

impl OpCounts {
    /// Total number of operations.
    pub fn total(&self) -> u64 {
        self.members + self.inserts + self.deletes
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: OpCounts) {
        self.members += other.members;
        self.hits += other.hits;
        self.inserts += other.inserts;
        self.inserted += other.inserted;
        self.deletes += other.deletes;
        self.deleted += other.deleted;
    }
}

/// The body of one worker.
pub type Job = Box<dyn FnOnce() -> Result<OpCounts> + Send + 'static>;

/// The trait that starts one worker of a fork-join batch.
pub trait WorkerSpawner {
    /// Starts `job` as worker number `worker` and returns a handle to join it.
    ///
    /// Returns `ListBenchError::WorkerStart` if the worker could not be
    /// started. The job is dropped without running in that case.
    fn spawn(&self, worker: usize, job: Job) -> Result<JoinHandle<Result<OpCounts>>>;
}

/// Starts every worker on a new OS thread.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadSpawner;

impl WorkerSpawner for ThreadSpawner {
    fn spawn(&self, worker: usize, job: Job) -> Result<JoinHandle<Result<OpCounts>>> {
        // 用 Builder 而不是 thread::spawn，创建失败时返回 Err 而不是 panic
        thread::Builder::new()
            .name(format!("listbench-worker-{}", worker))
            .spawn(job)
            .map_err(|cause| ListBenchError::WorkerStart { worker, cause })
    }
}

impl<'a, S: WorkerSpawner + ?Sized> WorkerSpawner for &'a S {
    fn spawn(&self, worker: usize, job: Job) -> Result<JoinHandle<Result<OpCounts>>> {
        (**self).spawn(worker, job)
    }
}

/// Joins every handle in order and returns the merged tallies.
///
/// All handles are joined even when an earlier worker failed; the first
/// failure is returned afterwards.
pub fn join_all(handles: Vec<JoinHandle<Result<OpCounts>>>) -> Result<OpCounts> {
    let mut counts = OpCounts::default();
    let mut failure = None;
    for (worker, handle) in handles.into_iter().enumerate() {
        let outcome = match handle.join() {
            Ok(outcome) => outcome,
            Err(_) => Err(ListBenchError::WorkerPanicked { worker }),
        };
        match outcome {
            Ok(worker_counts) => counts.merge(worker_counts),
            Err(e) => {
                error!("Worker {} failed: {}", worker, e);
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(counts),
    }
}
