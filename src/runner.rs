use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::policy::{ListPolicy, MutexList, PolicyKind, RwLockList, SerialList};
use crate::spawner::{join_all, Job, OpCounts, ThreadSpawner, WorkerSpawner};
use crate::workload::{Operation, RandomSource, SharedSource, SourceMode, WorkerSource, Workload};
use crate::{BenchmarkConfig, ListBenchError, Result, MAX_VALUE};

/// Elapsed seconds of every trial of one run, in trial order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingResult {
    trials: Vec<f64>,
}

impl TimingResult {
    /// Wraps per-trial timings.
    pub fn new(trials: Vec<f64>) -> TimingResult {
        TimingResult { trials }
    }

    /// The elapsed seconds, one value per trial.
    pub fn trials(&self) -> &[f64] {
        &self.trials
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Returns true if no trial was recorded.
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

/// The phases a trial moves through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Between trials.
    Idle,
    /// Filling the list with the initial values.
    Populating,
    /// Workers are running; this is the timed phase.
    Running,
    /// Workers are joined; the list is being cleared.
    Collecting,
}

/// Splits `operations` into `workers` shares that differ by at most one.
///
/// The first `operations % workers` workers get the larger share. The shares
/// always sum to `operations`. Zero workers get an empty split.
pub fn partition(operations: u64, workers: u32) -> Vec<u64> {
    if workers == 0 {
        return Vec::new();
    }
    let workers = u64::from(workers);
    let base = operations / workers;
    let rem = operations % workers;
    (0..workers)
        .map(|i| if i < rem { base + 1 } else { base })
        .collect()
}

/// Inserts random values until the list holds `n` more distinct values.
///
/// Duplicates are drawn again, so the number of draws grows quickly as `n`
/// approaches `MAX_VALUE`. Returns the number of draws.
pub fn populate<P, R>(list: &P, n: u32, source: &mut R) -> Result<u64>
where
    P: ListPolicy + ?Sized,
    R: RandomSource,
{
    if n > MAX_VALUE {
        return Err(ListBenchError::PopulationTooLarge { n });
    }
    let mut accepted = 0;
    let mut draws = 0;
    while accepted < n {
        draws += 1;
        if list.insert(source.value())? {
            accepted += 1;
        }
    }
    Ok(draws)
}

/// Runs `operations` steps of `workload` against `list`.
pub fn drive<P, R>(list: &P, operations: u64, workload: &mut Workload<R>) -> Result<OpCounts>
where
    P: ListPolicy + ?Sized,
    R: RandomSource,
{
    let mut counts = OpCounts::default();
    for _ in 0..operations {
        let (op, value) = workload.next_op();
        let succeeded = list.apply(op, value)?;
        let hit = if succeeded { 1 } else { 0 };
        match op {
            Operation::Member => {
                counts.members += 1;
                counts.hits += hit;
            }
            Operation::Insert => {
                counts.inserts += 1;
                counts.inserted += hit;
            }
            Operation::Delete => {
                counts.deletes += 1;
                counts.deleted += hit;
            }
        }
    }
    Ok(counts)
}

/// Drives repeated trials of a benchmark over one list.
///
/// Every trial clears and repopulates the list, runs the timed phase, then
/// clears the list again. The list is empty when a run returns, whether it
/// succeeded or not.
pub struct BenchmarkRunner<S = ThreadSpawner> {
    config: BenchmarkConfig,
    spawner: S,
    seed: u64,
}

impl BenchmarkRunner<ThreadSpawner> {
    /// Creates a runner that starts every worker on a fresh OS thread.
    ///
    /// # Errors
    ///
    /// It returns a configuration error if `config` does not validate.
    pub fn new(config: BenchmarkConfig) -> Result<BenchmarkRunner<ThreadSpawner>> {
        BenchmarkRunner::with_spawner(config, ThreadSpawner)
    }
}

impl<S: WorkerSpawner> BenchmarkRunner<S> {
    /// Creates a runner that starts workers through `spawner`.
    pub fn with_spawner(config: BenchmarkConfig, spawner: S) -> Result<BenchmarkRunner<S>> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(BenchmarkRunner {
            config,
            spawner,
            seed,
        })
    }

    /// The validated config.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// The seed every random draw of this runner derives from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs the benchmark against a fresh list guarded by `kind`.
    pub fn run_policy(&self, kind: PolicyKind) -> Result<TimingResult> {
        info!("Policy: {}", kind);
        match kind {
            PolicyKind::Serial => self.run_serial(&SerialList::new()),
            PolicyKind::Mutex => self.run_parallel(&MutexList::new()),
            PolicyKind::RwLock => self.run_parallel(&RwLockList::new()),
        }
    }

    /// Runs every trial on the calling thread.
    ///
    /// The configured thread count is ignored; all `operations` run in one
    /// sequence.
    pub fn run_serial<P>(&self, list: &P) -> Result<TimingResult>
    where
        P: ListPolicy + ?Sized,
    {
        if self.config.threads > 1 {
            warn!(
                "Serial run ignores the thread count ({}), using the calling thread",
                self.config.threads
            );
        }
        self.run_trials(list, 1, |sources| {
            let mut counts = OpCounts::default();
            for source in sources {
                let mut workload = Workload::new(self.config.mix, source);
                counts.merge(drive(list, self.config.operations, &mut workload)?);
            }
            Ok(counts)
        })
    }

    /// Runs every trial as a fork-join batch of `threads` workers sharing
    /// `list`.
    pub fn run_parallel<P>(&self, list: &P) -> Result<TimingResult>
    where
        P: ListPolicy + Clone + Send + Sync + 'static,
    {
        self.run_trials(list, self.config.threads, |sources| {
            self.fork_join(list, sources)
        })
    }

    fn run_trials<P, F>(&self, list: &P, workers: u32, mut timed: F) -> Result<TimingResult>
    where
        P: ListPolicy + ?Sized,
        F: FnMut(Vec<WorkerSource>) -> Result<OpCounts>,
    {
        let runs = self.config.runs as usize;
        let mut trials = Vec::new();
        trials
            .try_reserve_exact(runs)
            .map_err(|_| ListBenchError::Allocation)?;
        info!(
            "n = {}, m = {}, mix = {:?}, runs = {}, workers = {}, source = {}, seed = {}",
            self.config.initial_size,
            self.config.operations,
            self.config.mix,
            runs,
            workers,
            self.config.source,
            self.seed
        );

        let mut master = StdRng::seed_from_u64(self.seed);
        for trial in 0..runs {
            self.enter(trial, Phase::Populating);
            list.clear()?;
            let mut population = StdRng::seed_from_u64(master.gen());
            let draws = match populate(list, self.config.initial_size, &mut population) {
                Ok(draws) => draws,
                Err(e) => return Err(self.abandon(list, e)),
            };
            debug!(
                "Trial {}: {} values from {} draws",
                trial, self.config.initial_size, draws
            );
            let sources = self.sources(&mut master, workers);

            self.enter(trial, Phase::Running);
            let start = Instant::now();
            let outcome = timed(sources);
            let elapsed = start.elapsed();

            self.enter(trial, Phase::Collecting);
            let counts = match outcome {
                Ok(counts) => counts,
                Err(e) => return Err(self.abandon(list, e)),
            };
            list.clear()?;
            let secs = elapsed.as_secs_f64();
            debug!(
                "Trial {}: {:.6}s, {} operations, {:?}",
                trial,
                secs,
                counts.total(),
                counts
            );
            trials.push(secs);
            self.enter(trial, Phase::Idle);
        }
        Ok(TimingResult::new(trials))
    }

    fn fork_join<P>(&self, list: &P, sources: Vec<WorkerSource>) -> Result<OpCounts>
    where
        P: ListPolicy + Clone + Send + Sync + 'static,
    {
        let shares = partition(self.config.operations, self.config.threads);
        let mut handles = Vec::with_capacity(shares.len());
        for (worker, (operations, source)) in shares.into_iter().zip(sources).enumerate() {
            let list = list.clone();
            let mut workload = Workload::new(self.config.mix, source);
            let job: Job = Box::new(move || drive(&list, operations, &mut workload));
            match self.spawner.spawn(worker, job) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!(
                        "Failed to start worker {}, joining {} started workers",
                        worker,
                        handles.len()
                    );
                    // 已启动的线程必须先 join 完，再把启动失败报告出去
                    if let Err(joined) = join_all(handles) {
                        warn!("A started worker also failed: {}", joined);
                    }
                    return Err(e);
                }
            }
        }
        join_all(handles)
    }

    // One source per worker. Seeds are drawn from `master` in both modes so
    // that the population stream of later trials does not depend on the mode.
    fn sources(&self, master: &mut StdRng, workers: u32) -> Vec<WorkerSource> {
        let seeds: Vec<u64> = (0..workers).map(|_| master.gen()).collect();
        match self.config.source {
            SourceMode::Local => seeds
                .into_iter()
                .map(|seed| WorkerSource::Local(StdRng::seed_from_u64(seed)))
                .collect(),
            SourceMode::Shared => {
                let shared = SharedSource::seed_from_u64(seeds.first().cloned().unwrap_or(0));
                (0..workers)
                    .map(|_| WorkerSource::Shared(shared.clone()))
                    .collect()
            }
        }
    }

    fn abandon<P: ListPolicy + ?Sized>(&self, list: &P, e: ListBenchError) -> ListBenchError {
        if let Err(clear) = list.clear() {
            warn!("Failed to clear the list after an aborted trial: {}", clear);
        }
        e
    }

    fn enter(&self, trial: usize, phase: Phase) {
        debug!("Trial {}: {:?}", trial, phase);
    }
}
