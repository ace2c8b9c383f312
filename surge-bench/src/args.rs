use std::num::NonZeroUsize;
use std::time::Duration;
use clap::{Parser, ValueEnum};
use surge::Error;
use crate::orchestrator::{self, Sweep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// 1,000 units per strategy
    #[default]
    Quick,
    /// 10,000 units per strategy
    Full,
}

/// Runs the same batch of simulated I/O-bound work units under a bounded
/// thread pool, a thread per unit, and lightweight tasks, then compares them.
#[derive(Parser, Debug)]
#[command(name = "surge-bench", version)]
pub struct Cli {
    /// Sweep size
    #[arg(long, value_enum, default_value_t = Mode::Quick)]
    pub mode: Mode,

    /// Simulated I/O delay per unit, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Give up waiting on a batch after this many milliseconds
    #[arg(long, default_value_t = 60_000)]
    pub timeout_ms: u64,

    /// Override the number of units per batch
    #[arg(long)]
    pub units: Option<usize>,

    /// Override the bounded pool's thread count
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Worker threads underneath the lightweight tasks
    #[arg(long)]
    pub workers: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn sweep(&self) -> Result<Sweep, Error> {
        let (units, capacity) = match self.mode {
            Mode::Quick => (orchestrator::QUICK_UNITS, orchestrator::QUICK_CAPACITY),
            Mode::Full => (orchestrator::FULL_UNITS, orchestrator::FULL_CAPACITY),
        };
        let capacity = match self.capacity {
            Some(capacity) => positive(capacity, "--capacity")?,
            None => capacity,
        };
        let mut sweep = Sweep::across_all(self.units.unwrap_or(units), capacity);
        sweep.delay = Duration::from_millis(self.delay_ms);
        sweep.timeout = Duration::from_millis(self.timeout_ms);
        if let Some(workers) = self.workers {
            sweep.strategy_opts.lightweight_workers = positive(workers, "--workers")?;
        }
        Ok(sweep)
    }
}

fn positive(n: usize, flag: &str) -> Result<NonZeroUsize, Error> {
    NonZeroUsize::new(n).ok_or_else(|| Error::InvalidConfig(format!("{flag} must be positive")))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use surge::result::ContextCount;
    use surge::Error;
    use crate::args::{Cli, Mode};

    #[test]
    fn defaults_to_quick_sweep() {
        let cli = Cli::parse_from(["surge-bench"]);
        assert_eq!(Mode::Quick, cli.mode);
        let sweep = cli.sweep().unwrap();
        assert_eq!(3, sweep.runs.len());
        assert!(sweep.runs.iter().all(|run| run.units == 1_000));
        assert_eq!(ContextCount::Fixed(50), sweep.runs[0].spec.contexts());
    }

    #[test]
    fn full_mode_with_overrides() {
        let cli = Cli::parse_from(["surge-bench", "--mode", "full", "--delay-ms", "5", "--timeout-ms", "250", "--capacity", "8", "--workers", "2"]);
        let sweep = cli.sweep().unwrap();
        assert!(sweep.runs.iter().all(|run| run.units == 10_000));
        assert_eq!(ContextCount::Fixed(8), sweep.runs[0].spec.contexts());
        assert_eq!(std::time::Duration::from_millis(5), sweep.delay);
        assert_eq!(std::time::Duration::from_millis(250), sweep.timeout);
        assert_eq!(2, sweep.strategy_opts.lightweight_workers.get());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cli = Cli::parse_from(["surge-bench", "--capacity", "0"]);
        assert!(matches!(cli.sweep(), Err(Error::InvalidConfig(_))));
    }
}
