use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};
use crate::completable::Outcome;
use crate::error::Error;
use crate::interrupt::Interrupt;
use crate::remedy::Remedy;
use crate::result::ContextCount;
use crate::strategy::{Ledger, Pending, Resolver, Strategy};
use crate::work::{self, WorkUnit};

type Task = Box<dyn FnOnce() + Send>;

pub(crate) fn label(capacity: NonZeroUsize) -> String {
    format!("bounded pool ({capacity} threads)")
}

/// A fixed number of reusable worker threads fed from a single FIFO queue.
/// Once every worker is busy, further units wait in the queue in submission
/// order.
pub struct BoundedPool {
    capacity: NonZeroUsize,
    running: Arc<AtomicBool>,
    interrupt: Arc<Interrupt>,
    sender: Option<Sender<Task>>,
    threads: Option<Vec<JoinHandle<()>>>,
    ledger: Ledger,
}

impl BoundedPool {
    pub fn new(capacity: NonZeroUsize) -> Result<Self, Error> {
        let (sender, receiver) = mpsc::channel::<Task>();
        let receiver = Arc::new(Mutex::new(receiver));
        let threads = (0..capacity.get())
            .map(|index| {
                let receiver = receiver.clone();
                thread::Builder::new()
                    .name(format!("bounded-{index}"))
                    .spawn(move || worker_loop(&receiver))
                    .map_err(Error::exhausted("bounded pool worker thread"))
            })
            // on failure the sender is dropped on return, releasing the workers already spawned
            .collect::<Result<Vec<_>, _>>()?;
        debug!(capacity = capacity.get(), "bounded pool started");

        Ok(Self {
            capacity,
            running: Arc::new(AtomicBool::new(true)),
            interrupt: Arc::default(),
            sender: Some(sender),
            threads: Some(threads),
            ledger: Ledger::default(),
        })
    }

    fn prepare_task(&self, unit: WorkUnit) -> (Pending, Task) {
        let (pending, resolver) = Resolver::new();
        let running = self.running.clone();
        let interrupt = self.interrupt.clone();
        let task = Box::new(move || {
            // --- runs on the worker thread
            let outcome = if running.load(Ordering::Relaxed) {
                Outcome::Success(work::simulate(unit, &interrupt))
            } else {
                Outcome::Abort
            };
            resolver.resolve(outcome);
            // ---
        });
        (pending, task)
    }
}

fn worker_loop(receiver: &Mutex<Receiver<Task>>) {
    loop {
        // the lock is released before the task runs
        let task = receiver.lock().remedy().recv();
        match task {
            Ok(task) => task(),
            Err(_) => return,
        }
    }
}

impl Strategy for BoundedPool {
    fn name(&self) -> String {
        label(self.capacity)
    }

    fn contexts(&self) -> ContextCount {
        ContextCount::Fixed(self.capacity.get())
    }

    fn submit(&self, unit: WorkUnit) -> Result<Pending, Error> {
        let sender = self.sender.as_ref().ok_or(Error::StrategyClosed)?;
        let (pending, task) = self.prepare_task(unit);
        sender.send(task).map_err(|_| Error::StrategyClosed)?;
        self.ledger.record(&pending);
        Ok(pending)
    }

    fn drain(&self) -> Vec<Outcome<work::CompletionRecord>> {
        self.ledger.drain()
    }

    fn reap(&self) -> Vec<Outcome<work::CompletionRecord>> {
        self.ledger.reap()
    }

    fn shutdown(&mut self) {
        let Some(threads) = self.threads.take() else {
            return;
        };
        self.running.store(false, Ordering::Relaxed);
        self.interrupt.raise();
        // workers drain what is left in the queue, aborting it, then exit on disconnect
        self.sender = None;
        for thread in threads {
            if thread.join().is_err() {
                warn!("bounded pool worker panicked");
            }
        }
        debug!(capacity = self.capacity.get(), "bounded pool shut down");
    }
}

impl Drop for BoundedPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
