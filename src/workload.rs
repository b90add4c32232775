//! Randomized operation streams.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{ListBenchError, Result, MAX_VALUE};

const MIX_TOLERANCE: f64 = 1e-6;

/// One kind of list operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Membership query.
    Member,
    /// Insertion.
    Insert,
    /// Deletion.
    Delete,
}

/// The fractions of Member, Insert and Delete operations in a workload.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mix {
    /// Fraction of `Member` operations.
    pub member: f64,
    /// Fraction of `Insert` operations.
    pub insert: f64,
    /// Fraction of `Delete` operations.
    pub delete: f64,
}

impl Mix {
    /// Creates a mix without validating it.
    pub fn new(member: f64, insert: f64, delete: f64) -> Mix {
        Mix {
            member,
            insert,
            delete,
        }
    }

    /// Checks that the fractions are non-negative and sum to 1.0 within 1e-6.
    pub fn validate(&self) -> Result<()> {
        let fractions = [self.member, self.insert, self.delete];
        if fractions.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(ListBenchError::NegativeFraction);
        }
        let sum = self.member + self.insert + self.delete;
        if sum > 1.0 + MIX_TOLERANCE || sum < 1.0 - MIX_TOLERANCE {
            return Err(ListBenchError::InvalidMix { sum });
        }
        Ok(())
    }

    /// Picks the operation for a probability drawn from `[0, 1)` by
    /// cumulative thresholding.
    pub fn pick(&self, p: f64) -> Operation {
        if p < self.member {
            Operation::Member
        } else if p < self.member + self.insert {
            Operation::Insert
        } else {
            Operation::Delete
        }
    }
}

impl Default for Mix {
    fn default() -> Mix {
        Mix::new(0.99, 0.005, 0.005)
    }
}

/// Where the workers of a trial draw their random numbers from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Each worker owns an independently seeded generator.
    Local,
    /// All workers share one generator behind its own lock.
    Shared,
}

impl Default for SourceMode {
    fn default() -> SourceMode {
        SourceMode::Local
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceMode::Local => write!(f, "local"),
            SourceMode::Shared => write!(f, "shared"),
        }
    }
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<SourceMode, String> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(SourceMode::Local),
            "shared" => Ok(SourceMode::Shared),
            _ => Err(format!("unknown random source `{}`", s)),
        }
    }
}

/// A source of the two draws every workload step needs.
pub trait RandomSource {
    /// Draws a probability uniformly from `[0, 1)`.
    fn probability(&mut self) -> f64;

    /// Draws a value uniformly from `[0, MAX_VALUE)`.
    fn value(&mut self) -> u32;
}

impl RandomSource for StdRng {
    fn probability(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn value(&mut self) -> u32 {
        self.gen_range(0, MAX_VALUE)
    }
}

/// A generator shared by several workers.
///
/// Each draw locks the generator on its own. The lock is independent of any
/// lock guarding the list.
#[derive(Clone)]
pub struct SharedSource(Arc<Mutex<StdRng>>);

impl SharedSource {
    /// Creates a shared generator from a seed.
    pub fn seed_from_u64(seed: u64) -> SharedSource {
        SharedSource(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // 生成器状态在 panic 后依然可用，忽略中毒标记
        let mut rng = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl RandomSource for SharedSource {
    fn probability(&mut self) -> f64 {
        self.with(|rng| rng.gen::<f64>())
    }

    fn value(&mut self) -> u32 {
        self.with(|rng| rng.gen_range(0, MAX_VALUE))
    }
}

/// The random source handed to one worker.
pub enum WorkerSource {
    /// A generator owned by this worker alone.
    Local(StdRng),
    /// A handle to the trial's shared generator.
    Shared(SharedSource),
}

impl RandomSource for WorkerSource {
    fn probability(&mut self) -> f64 {
        match self {
            WorkerSource::Local(rng) => rng.probability(),
            WorkerSource::Shared(source) => source.probability(),
        }
    }

    fn value(&mut self) -> u32 {
        match self {
            WorkerSource::Local(rng) => rng.value(),
            WorkerSource::Shared(source) => source.value(),
        }
    }
}

/// An endless stream of `(Operation, value)` pairs drawn according to a `Mix`.
pub struct Workload<R: RandomSource> {
    mix: Mix,
    source: R,
}

impl<R: RandomSource> Workload<R> {
    /// Creates a workload over `source`.
    pub fn new(mix: Mix, source: R) -> Workload<R> {
        Workload { mix, source }
    }

    /// Draws the next operation and its operand.
    pub fn next_op(&mut self) -> (Operation, u32) {
        // 先抽概率再抽值，与两次独立抽样的顺序保持一致
        let p = self.source.probability();
        let value = self.source.value();
        (self.mix.pick(p), value)
    }
}

impl<R: RandomSource> Iterator for Workload<R> {
    type Item = (Operation, u32);

    fn next(&mut self) -> Option<(Operation, u32)> {
        Some(self.next_op())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_cumulative() {
        let mix = Mix::new(0.5, 0.3, 0.2);
        assert_eq!(mix.pick(0.0), Operation::Member);
        assert_eq!(mix.pick(0.4999), Operation::Member);
        assert_eq!(mix.pick(0.5), Operation::Insert);
        assert_eq!(mix.pick(0.7999), Operation::Insert);
        assert_eq!(mix.pick(0.8), Operation::Delete);
        assert_eq!(mix.pick(0.9999), Operation::Delete);
    }

    #[test]
    fn mix_tolerance() {
        assert!(Mix::new(0.8, 0.1, 0.1).validate().is_ok());
        assert!(Mix::new(0.3333333, 0.3333333, 0.3333333).validate().is_ok());
        assert!(Mix::new(1.0, 0.0, 0.0).validate().is_ok());
        match Mix::new(0.5, 0.1, 0.1).validate() {
            Err(ListBenchError::InvalidMix { sum }) => assert!((sum - 0.7).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Mix::new(0.9, 0.1, 0.1 + 2e-6).validate().is_err());
        match Mix::new(1.2, -0.1, -0.1).validate() {
            Err(ListBenchError::NegativeFraction) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn draws_stay_in_range() {
        let mut workload = Workload::new(Mix::new(0.2, 0.4, 0.4), StdRng::seed_from_u64(7));
        for (_, value) in workload.by_ref().take(10_000) {
            assert!(value < MAX_VALUE);
        }
    }

    #[test]
    fn seeded_local_streams_repeat() {
        let mix = Mix::default();
        let a: Vec<_> = Workload::new(mix, StdRng::seed_from_u64(42)).take(100).collect();
        let b: Vec<_> = Workload::new(mix, StdRng::seed_from_u64(42)).take(100).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn shared_source_is_one_stream() {
        let shared = SharedSource::seed_from_u64(9);
        let mut first = WorkerSource::Shared(shared.clone());
        let mut second = WorkerSource::Shared(shared);
        let mut reference = StdRng::seed_from_u64(9);
        assert_eq!(first.value(), RandomSource::value(&mut reference));
        assert_eq!(second.value(), RandomSource::value(&mut reference));
    }
}
