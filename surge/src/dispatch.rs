use std::time::{Duration, Instant};
use tracing::{debug, warn};
use crate::completable::Outcome;
use crate::deadline::Deadline;
use crate::error::Error;
use crate::result::BatchResult;
use crate::strategy::Strategy;
use crate::work::WorkUnit;

/// Submits `units` work units to `strategy` and waits for them to finish,
/// for at most `timeout` measured from the first submission.
///
/// Each unit is counted once, however the strategy orders their completion.
/// On timeout the result carries however many units had completed by then;
/// this is not an error. Handles still outstanding are dropped, so anything
/// that completes afterwards is discarded with its task.
///
/// Interrupted units count as completed; units a strategy abandoned without
/// running do not. Resolved units are reaped from the strategy before
/// returning.
pub fn run_batch(strategy: &dyn Strategy, units: usize, delay: Duration, timeout: Duration) -> Result<BatchResult, Error> {
    let strategy_name = strategy.name();
    let start = Instant::now();
    let mut deadline = Deadline::after(timeout);
    let pending = (0..units)
        .map(|id| strategy.submit(WorkUnit { id, delay }))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(strategy = %strategy_name, units, elapsed = ?start.elapsed(), "batch submitted");

    // Past the deadline, each remaining wait degenerates into a peek.
    let completed = pending
        .iter()
        .filter(|pending| matches!(*pending.try_get_until(&mut deadline), Some(Outcome::Success(_))))
        .count();
    let duration = start.elapsed();
    drop(pending);

    // forget what has resolved, so a strategy reused across batches holds only units in flight
    let interrupted = strategy
        .reap()
        .iter()
        .filter(|outcome| matches!(outcome, Outcome::Success(record) if record.is_interrupted()))
        .count();
    if completed < units {
        warn!(strategy = %strategy_name, units, completed, ?timeout, "batch incomplete");
    } else {
        debug!(strategy = %strategy_name, units, interrupted, ?duration, "batch complete");
    }
    Ok(BatchResult::new(strategy_name, duration, completed, units, strategy.contexts()))
}
