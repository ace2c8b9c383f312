//! Synthetic I/O-bound work. A unit does nothing but suspend its execution
//! context for a fixed delay, standing in for a remote call or a query.

use std::fmt;
use std::thread;
use std::time::Duration;
use crate::interrupt::Interrupt;

/// One unit of synthetic work, identified by its index within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    pub id: usize,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    /// Suspension was cut short by an [`Interrupt`]. Still counts as done.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub unit_id: usize,
    /// The thread or task that ran the unit. Diagnostic only.
    pub executor_label: String,
    pub status: Status,
}

impl CompletionRecord {
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.status == Status::Interrupted
    }
}

impl fmt::Display for CompletionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Completed => write!(f, "unit-{} completed by {}", self.unit_id, self.executor_label),
            Status::Interrupted => write!(f, "unit-{} interrupted on {}", self.unit_id, self.executor_label),
        }
    }
}

/// Blocks the calling thread for `unit.delay`, or until `interrupt` is raised.
pub fn simulate(unit: WorkUnit, interrupt: &Interrupt) -> CompletionRecord {
    let status = if interrupt.wait_for(unit.delay) {
        Status::Interrupted
    } else {
        Status::Completed
    };
    CompletionRecord {
        unit_id: unit.id,
        executor_label: thread_label(),
        status,
    }
}

/// Suspends the calling task for `unit.delay`, or until `interrupt` is
/// raised. The worker thread underneath is free to run other tasks meanwhile.
pub async fn simulate_async(unit: WorkUnit, interrupt: &Interrupt) -> CompletionRecord {
    let status = tokio::select! {
        biased;
        _ = interrupt.raised() => Status::Interrupted,
        _ = tokio::time::sleep(unit.delay) => Status::Completed,
    };
    CompletionRecord {
        unit_id: unit.id,
        executor_label: format!("task on {}", thread_label()),
        status,
    }
}

fn thread_label() -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => name.to_owned(),
        None => format!("{:?}", current.id()),
    }
}
