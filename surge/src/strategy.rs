//! Execution strategies: policies for mapping a batch of work units onto
//! concurrent execution contexts.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use parking_lot::Mutex;
use crate::completable::{Completable, Outcome};
use crate::error::Error;
use crate::result::ContextCount;
use crate::work::{CompletionRecord, WorkUnit};

pub mod bounded;
pub mod lightweight;
pub mod unbounded;

pub use bounded::BoundedPool;
pub use lightweight::LightweightTasks;
pub use unbounded::UnboundedPool;

/// A handle on a submitted unit, resolved once the unit has run or has been
/// abandoned by a shutdown.
pub type Pending = Arc<Completable<Outcome<CompletionRecord>>>;

pub trait Strategy: Send {
    fn name(&self) -> String;

    fn contexts(&self) -> ContextCount;

    /// Hands a unit over for execution. Fails with [`Error::StrategyClosed`]
    /// once the strategy has been shut down.
    fn submit(&self, unit: WorkUnit) -> Result<Pending, Error>;

    /// Blocks until every unit submitted so far is resolved, returning their
    /// outcomes in submission order. Units abandoned by a shutdown resolve as
    /// [`Outcome::Abort`].
    fn drain(&self) -> Vec<Outcome<CompletionRecord>>;

    /// Like [`drain`](Self::drain), but without blocking: returns and forgets
    /// the units resolved so far, keeping the rest.
    fn reap(&self) -> Vec<Outcome<CompletionRecord>>;

    /// Interrupts running units, abandons queued ones and releases all
    /// execution contexts. Calling it again does nothing.
    fn shutdown(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Bounded,
    Unbounded,
    Lightweight,
}

/// Describes a strategy to be constructed. Capacity applies to
/// [`StrategyKind::Bounded`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySpec {
    kind: StrategyKind,
    capacity: Option<NonZeroUsize>,
}

impl StrategySpec {
    pub fn bounded(capacity: usize) -> Result<Self, Error> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::InvalidConfig("bounded pool capacity must be positive".into()))?;
        Ok(Self::with_capacity(capacity))
    }

    pub const fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            kind: StrategyKind::Bounded,
            capacity: Some(capacity),
        }
    }

    pub const fn unbounded() -> Self {
        Self {
            kind: StrategyKind::Unbounded,
            capacity: None,
        }
    }

    pub const fn lightweight() -> Self {
        Self {
            kind: StrategyKind::Lightweight,
            capacity: None,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    pub fn contexts(&self) -> ContextCount {
        match (self.kind, self.capacity) {
            (StrategyKind::Bounded, Some(capacity)) => ContextCount::Fixed(capacity.get()),
            (StrategyKind::Bounded, None) | (StrategyKind::Unbounded, _) => ContextCount::Unbounded,
            (StrategyKind::Lightweight, _) => ContextCount::Lightweight,
        }
    }

    /// The name the built strategy would report, available without building it.
    pub fn label(&self, opts: &StrategyOptions) -> String {
        match (self.kind, self.capacity) {
            (StrategyKind::Bounded, Some(capacity)) => bounded::label(capacity),
            (StrategyKind::Bounded, None) => "bounded pool".into(),
            (StrategyKind::Unbounded, _) => unbounded::LABEL.into(),
            (StrategyKind::Lightweight, _) => lightweight::label(opts.lightweight_workers),
        }
    }

    /// Constructs a fresh strategy that exclusively owns its execution contexts.
    pub fn build(&self, opts: &StrategyOptions) -> Result<Box<dyn Strategy>, Error> {
        match self.kind {
            StrategyKind::Bounded => {
                let capacity = self
                    .capacity
                    .ok_or_else(|| Error::InvalidConfig("bounded pool requires a capacity".into()))?;
                Ok(Box::new(BoundedPool::new(capacity)?))
            }
            StrategyKind::Unbounded => Ok(Box::new(UnboundedPool::new(opts.thread_stack_size))),
            StrategyKind::Lightweight => Ok(Box::new(LightweightTasks::new(opts.lightweight_workers)?)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrategyOptions {
    /// Worker threads underneath the lightweight task runtime.
    pub lightweight_workers: NonZeroUsize,

    /// Stack size for threads spawned per unit by the unbounded pool. `None`
    /// uses the platform default.
    pub thread_stack_size: Option<usize>,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            lightweight_workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            thread_stack_size: Some(256 * 1024),
        }
    }
}

/// The write side of a [`Pending`] handle. Resolving consumes it; dropping it
/// unresolved, as happens to units a shutdown never gets around to, aborts
/// the unit instead, so no handle is ever left hanging.
pub(crate) struct Resolver(Pending);

impl Resolver {
    pub(crate) fn new() -> (Pending, Self) {
        let pending = Pending::default();
        (pending.clone(), Self(pending))
    }

    pub(crate) fn resolve(self, outcome: Outcome<CompletionRecord>) {
        let _ = self.0.complete(outcome);
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        let _ = self.0.complete(Outcome::Abort);
    }
}

/// Handles of units submitted to a strategy and not yet drained.
#[derive(Default)]
pub(crate) struct Ledger {
    pending: Mutex<Vec<Pending>>,
}

impl Ledger {
    pub(crate) fn record(&self, pending: &Pending) {
        self.pending.lock().push(pending.clone());
    }

    pub(crate) fn drain(&self) -> Vec<Outcome<CompletionRecord>> {
        let pending = std::mem::take(&mut *self.pending.lock());
        pending.iter().map(|pending| pending.get().clone()).collect()
    }

    pub(crate) fn reap(&self) -> Vec<Outcome<CompletionRecord>> {
        let mut resolved = Vec::new();
        self.pending.lock().retain(|pending| match &*pending.peek() {
            Some(outcome) => {
                resolved.push(outcome.clone());
                false
            }
            None => true,
        });
        resolved
    }
}
