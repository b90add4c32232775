use failure::Fail;
use std::io;
use std::sync::PoisonError;

/// Error type for listbench
#[derive(Fail, Debug)]
pub enum ListBenchError {
    /// The three operation fractions do not sum to 1.0.
    #[fail(display = "Fractions must sum to 1.0 (got {})", sum)]
    InvalidMix {
        /// The actual sum of the fractions.
        sum: f64,
    },
    /// One of the operation fractions is negative or not a number.
    #[fail(display = "Fractions must be non-negative numbers")]
    NegativeFraction,
    /// The worker thread count is zero.
    #[fail(display = "Number of threads must be > 0")]
    InvalidThreadCount,
    /// The trial count is zero.
    #[fail(display = "Runcount must be > 0")]
    InvalidRunCount,
    /// More distinct values were requested than the value range holds.
    #[fail(display = "Cannot populate {} unique values from [0, 65536)", n)]
    PopulationTooLarge {
        /// The requested population size.
        n: u32,
    },
    /// A value outside `[0, MAX_VALUE)` was handed to the list.
    #[fail(display = "Value {} is out of range", value)]
    ValueOutOfRange {
        /// The rejected value.
        value: u32,
    },
    /// A list node or the results buffer could not be allocated.
    #[fail(display = "Memory allocation failed")]
    Allocation,
    /// The OS refused to start a worker thread.
    #[fail(display = "Failed to start worker {}: {}", worker, cause)]
    WorkerStart {
        /// Index of the worker that failed to start.
        worker: usize,
        /// The underlying error.
        #[cause]
        cause: io::Error,
    },
    /// A worker thread panicked before finishing its share.
    #[fail(display = "Worker {} panicked", worker)]
    WorkerPanicked {
        /// Index of the panicked worker.
        worker: usize,
    },
    /// A lock guarding the list was poisoned by a panicking holder.
    #[fail(display = "Lock poisoned")]
    LockPoisoned,
    /// IO error
    #[fail(display = "IO error: {}", _0)]
    Io(#[cause] io::Error),
    /// Serialization or deserialization error
    #[fail(display = "serde_json error: {}", _0)]
    Serde(#[cause] serde_json::Error),
    /// Unparsable operator input
    #[fail(display = "Invalid input: {}", _0)]
    Input(String),
}

impl ListBenchError {
    /// Returns true for errors detected while validating a configuration,
    /// before any trial runs.
    pub fn is_configuration(&self) -> bool {
        match self {
            ListBenchError::InvalidMix { .. }
            | ListBenchError::NegativeFraction
            | ListBenchError::InvalidThreadCount
            | ListBenchError::InvalidRunCount
            | ListBenchError::PopulationTooLarge { .. } => true,
            _ => false,
        }
    }
}

impl From<io::Error> for ListBenchError {
    fn from(err: io::Error) -> ListBenchError {
        ListBenchError::Io(err)
    }
}

impl From<serde_json::Error> for ListBenchError {
    fn from(err: serde_json::Error) -> ListBenchError {
        ListBenchError::Serde(err)
    }
}

// 锁中毒只说明持锁线程 panic 了，具体是哪把锁不重要
impl<T> From<PoisonError<T>> for ListBenchError {
    fn from(_: PoisonError<T>) -> ListBenchError {
        ListBenchError::LockPoisoned
    }
}

/// Result type for listbench
pub type Result<T> = std::result::Result<T, ListBenchError>;
