use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;
use crate::completable::Outcome;
use crate::error::Error;
use crate::interrupt::Interrupt;
use crate::result::ContextCount;
use crate::strategy::{Ledger, Pending, Resolver, Strategy};
use crate::work::{self, CompletionRecord, WorkUnit};

/// How long a shutdown waits for interrupted tasks to wind down before
/// abandoning the runtime's threads.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

pub(crate) fn label(workers: NonZeroUsize) -> String {
    format!("lightweight tasks ({workers} workers)")
}

/// Runs every unit as its own tokio task, multiplexed over a small, fixed set
/// of worker threads. A unit's delay suspends only its task; the worker
/// underneath moves on to other tasks.
pub struct LightweightTasks {
    workers: NonZeroUsize,
    runtime: Option<Runtime>,
    interrupt: Arc<Interrupt>,
    ledger: Ledger,
}

impl LightweightTasks {
    pub fn new(workers: NonZeroUsize) -> Result<Self, Error> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers.get())
            .thread_name("lightweight-worker")
            .enable_time()
            .build()
            .map_err(Error::exhausted("lightweight task runtime"))?;
        debug!(workers = workers.get(), "lightweight runtime started");

        Ok(Self {
            workers,
            runtime: Some(runtime),
            interrupt: Arc::default(),
            ledger: Ledger::default(),
        })
    }
}

impl Strategy for LightweightTasks {
    fn name(&self) -> String {
        label(self.workers)
    }

    fn contexts(&self) -> ContextCount {
        ContextCount::Lightweight
    }

    fn submit(&self, unit: WorkUnit) -> Result<Pending, Error> {
        let runtime = self.runtime.as_ref().ok_or(Error::StrategyClosed)?;
        let (pending, resolver) = Resolver::new();
        let interrupt = self.interrupt.clone();
        // a task dropped by the runtime before finishing drops its resolver, aborting the unit
        runtime.spawn(async move {
            let record = work::simulate_async(unit, &interrupt).await;
            resolver.resolve(Outcome::Success(record));
        });
        self.ledger.record(&pending);
        Ok(pending)
    }

    fn drain(&self) -> Vec<Outcome<CompletionRecord>> {
        self.ledger.drain()
    }

    fn reap(&self) -> Vec<Outcome<CompletionRecord>> {
        self.ledger.reap()
    }

    fn shutdown(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        self.interrupt.raise();
        runtime.shutdown_timeout(SHUTDOWN_GRACE);
        debug!(workers = self.workers.get(), "lightweight runtime shut down");
    }
}

impl Drop for LightweightTasks {
    fn drop(&mut self) {
        self.shutdown();
    }
}
