use std::sync::Arc;
use std::thread::{self, JoinHandle};
use parking_lot::Mutex;
use tracing::{debug, warn};
use crate::completable::Outcome;
use crate::error::Error;
use crate::interrupt::Interrupt;
use crate::result::ContextCount;
use crate::strategy::{Ledger, Pending, Resolver, Strategy};
use crate::work::{self, CompletionRecord, WorkUnit};

pub(crate) const LABEL: &str = "unbounded pool (thread per unit)";

/// Spawns a dedicated OS thread for every submitted unit, with no cap and no
/// backpressure. Resource usage grows with the number of units in flight.
pub struct UnboundedPool {
    stack_size: Option<usize>,
    interrupt: Arc<Interrupt>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    closed: bool,
    ledger: Ledger,
}

impl UnboundedPool {
    pub fn new(stack_size: Option<usize>) -> Self {
        Self {
            stack_size,
            interrupt: Arc::default(),
            threads: Mutex::default(),
            closed: false,
            ledger: Ledger::default(),
        }
    }

    /// Number of threads spawned and not yet reclaimed by a reap or a shutdown.
    pub fn spawned(&self) -> usize {
        self.threads.lock().len()
    }

    /// Joins every thread that has already exited, returning how many were
    /// reclaimed. Threads still running are left in place.
    fn reclaim_finished(&self) -> usize {
        let finished = {
            let mut threads = self.threads.lock();
            let (finished, running) = std::mem::take(&mut *threads)
                .into_iter()
                .partition::<Vec<_>, _>(JoinHandle::is_finished);
            *threads = running;
            finished
        };
        let reclaimed = finished.len();
        for thread in finished {
            if thread.join().is_err() {
                warn!("unbounded pool thread panicked");
            }
        }
        reclaimed
    }
}

impl Strategy for UnboundedPool {
    fn name(&self) -> String {
        LABEL.into()
    }

    fn contexts(&self) -> ContextCount {
        ContextCount::Unbounded
    }

    fn submit(&self, unit: WorkUnit) -> Result<Pending, Error> {
        if self.closed {
            return Err(Error::StrategyClosed);
        }
        let (pending, resolver) = Resolver::new();
        let interrupt = self.interrupt.clone();
        let mut builder = thread::Builder::new().name(format!("unbounded-{}", unit.id));
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }
        // a failed spawn drops the closure, aborting the handle we never return
        let thread = builder
            .spawn(move || resolver.resolve(Outcome::Success(work::simulate(unit, &interrupt))))
            .map_err(Error::exhausted("unbounded pool thread"))?;
        self.threads.lock().push(thread);
        self.ledger.record(&pending);
        Ok(pending)
    }

    fn drain(&self) -> Vec<Outcome<CompletionRecord>> {
        self.ledger.drain()
    }

    fn reap(&self) -> Vec<Outcome<CompletionRecord>> {
        let reclaimed = self.reclaim_finished();
        if reclaimed > 0 {
            debug!(reclaimed, "unbounded pool threads joined");
        }
        self.ledger.reap()
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.interrupt.raise();
        let threads = std::mem::take(&mut *self.threads.lock());
        let spawned = threads.len();
        for thread in threads {
            if thread.join().is_err() {
                warn!("unbounded pool thread panicked");
            }
        }
        debug!(spawned, "unbounded pool shut down");
    }
}

impl Drop for UnboundedPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
