use anyhow::bail;
use std::num::NonZeroUsize;
use std::time::Duration;
use surge::dispatch;
use surge::resource::{self, MemorySample, MemorySampler};
use surge::result::BatchResult;
use surge::strategy::{Strategy, StrategyOptions, StrategySpec};
use surge::Error;
use tracing::{info, warn};

pub mod print;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const QUICK_UNITS: usize = 1_000;
pub const QUICK_CAPACITY: NonZeroUsize = nonzero(50);
pub const FULL_UNITS: usize = 10_000;
pub const FULL_CAPACITY: NonZeroUsize = nonzero(200);

const fn nonzero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("zero capacity"),
    }
}

/// One strategy run over a batch of `units`.
#[derive(Debug, Clone)]
pub struct Run {
    pub spec: StrategySpec,
    pub units: usize,
}

#[derive(Debug, Clone)]
pub struct Sweep {
    pub runs: Vec<Run>,
    pub delay: Duration,
    pub timeout: Duration,
    pub strategy_opts: StrategyOptions,
}

impl Sweep {
    /// Every strategy over the same batch size, bounded pool first.
    pub fn across_all(units: usize, capacity: NonZeroUsize) -> Self {
        let runs = [StrategySpec::with_capacity(capacity), StrategySpec::unbounded(), StrategySpec::lightweight()]
            .into_iter()
            .map(|spec| Run { spec, units })
            .collect();
        Self {
            runs,
            delay: DEFAULT_DELAY,
            timeout: DEFAULT_TIMEOUT,
            strategy_opts: StrategyOptions::default(),
        }
    }

    pub fn quick() -> Self {
        Self::across_all(QUICK_UNITS, QUICK_CAPACITY)
    }

    pub fn full() -> Self {
        Self::across_all(FULL_UNITS, FULL_CAPACITY)
    }
}

/// The outcome of one run. A run that could not be carried out has a zeroed
/// result and the reason in `failure`. Its memory sample is kept when the
/// failure happened inside the measured batch.
#[derive(Debug, Clone)]
pub struct Report {
    pub result: BatchResult,
    pub memory: Option<MemorySample>,
    pub failure: Option<String>,
}

impl Report {
    fn failed(sweep: &Sweep, run: &Run, error: &Error, memory: Option<MemorySample>) -> Self {
        warn!(strategy = %run.spec.label(&sweep.strategy_opts), %error, "run failed");
        Self {
            result: BatchResult::failed(run.spec.label(&sweep.strategy_opts), run.units, run.spec.contexts()),
            memory,
            failure: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Decides whether a finished sweep counts as a hard failure. Timed-out and
/// individually failed runs are part of the results; only a sweep in which
/// no run could be carried out is an error.
pub fn outcome(reports: &[Report]) -> anyhow::Result<()> {
    if !reports.is_empty() && reports.iter().all(Report::is_failure) {
        bail!("no strategy could be run; see the failures above");
    }
    Ok(())
}

/// Carries out every run in `sweep`, one after another, returning reports in
/// configuration order. Failed or timed-out runs are recorded as such and the
/// sweep moves on.
pub fn run<S: MemorySampler + ?Sized>(sweep: &Sweep, sampler: &S) -> Vec<Report> {
    run_with(sweep, sampler, |run| run.spec.build(&sweep.strategy_opts))
}

/// As [`run`], constructing each strategy with `build`.
pub fn run_with<S, B>(sweep: &Sweep, sampler: &S, mut build: B) -> Vec<Report>
where
    S: MemorySampler + ?Sized,
    B: FnMut(&Run) -> Result<Box<dyn Strategy>, Error>,
{
    sweep
        .runs
        .iter()
        .map(|run| run_one(sweep, run, sampler, &mut build))
        .collect()
}

fn run_one<S, B>(sweep: &Sweep, run: &Run, sampler: &S, build: &mut B) -> Report
where
    S: MemorySampler + ?Sized,
    B: FnMut(&Run) -> Result<Box<dyn Strategy>, Error>,
{
    let mut strategy = match build(run) {
        Ok(strategy) => strategy,
        Err(error) => return Report::failed(sweep, run, &error, None),
    };
    info!(strategy = %strategy.name(), units = run.units, "starting run");

    let measured = resource::measure(sampler, || dispatch::run_batch(&*strategy, run.units, sweep.delay, sweep.timeout));
    strategy.shutdown();

    match measured.output {
        Ok(result) => {
            info!(
                strategy = %result.strategy_name(),
                completed = result.completed(),
                elapsed = ?result.duration(),
                memory_delta = measured.memory.delta(),
                "run finished"
            );
            Report {
                result,
                memory: Some(measured.memory),
                failure: None,
            }
        }
        Err(error) => Report::failed(sweep, run, &error, Some(measured.memory)),
    }
}

#[cfg(test)]
mod tests;
