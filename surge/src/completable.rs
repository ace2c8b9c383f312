use std::ops::Deref;
use std::sync::MutexGuard;
use crate::deadline::Deadline;
use crate::monitor::{Directive, Monitor};

/// A write-once slot that threads can block on until a value is assigned.
#[derive(Default, Debug)]
pub struct Completable<T> {
    monitor: Monitor<Option<T>>,
}

/// A view of a completed value. Holds the internal lock while alive, so keep
/// it short-lived.
pub struct Completed<'a, T> {
    guard: MutexGuard<'a, Option<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Abort,
    Success(T),
}

impl<T> Outcome<T> {
    #[inline]
    pub fn is_abort(&self) -> bool {
        matches!(self, Outcome::Abort)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    #[inline]
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Outcome::Abort => None,
            Outcome::Success(val) => Some(val),
        }
    }

    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Abort => None,
            Outcome::Success(val) => Some(val),
        }
    }
}

impl<T> Default for Outcome<T> {
    #[inline]
    fn default() -> Self {
        Outcome::Abort
    }
}

impl<T> Deref for Completed<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self.guard.as_ref() {
            Some(val) => val,
            None => unreachable!("completed view over an incomplete value"),
        }
    }
}

impl<T> Completable<T> {
    #[inline]
    pub fn new(val: T) -> Self {
        Self {
            monitor: Monitor::new(Some(val)),
        }
    }

    /// Completes this instance, assigning `val` if the instance is incomplete. Otherwise,
    /// the existing completed value is preserved and `val` is handed back to the caller.
    ///
    /// Returns `None` if the given value was persisted or `Some` containing the value if
    /// it could not be assigned.
    #[inline]
    pub fn complete(&self, val: T) -> Option<T> {
        let mut returned = Some(val);
        self.monitor.enter(|inner| {
            if inner.is_none() {
                *inner = returned.take();
                Directive::NotifyAll
            } else {
                Directive::Return
            }
        });
        returned
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.monitor.lock().is_some()
    }

    /// Blocks until the instance is complete.
    #[inline]
    pub fn get(&self) -> Completed<'_, T> {
        Completed {
            guard: self.wait_until(&mut Deadline::Forever),
        }
    }

    /// Returns immediately with the current state.
    #[inline]
    pub fn peek(&self) -> impl Deref<Target = Option<T>> + '_ {
        self.monitor.lock()
    }

    /// Waits for the instance to complete until `deadline`, which may be shared
    /// across several waits. The returned value is `None` if it timed out.
    #[inline]
    pub fn try_get_until(&self, deadline: &mut Deadline) -> impl Deref<Target = Option<T>> + '_ {
        self.wait_until(deadline)
    }

    #[inline]
    fn wait_until(&self, deadline: &mut Deadline) -> MutexGuard<'_, Option<T>> {
        self.monitor.enter(|state| {
            if state.is_none() {
                Directive::Wait(deadline.remaining())
            } else {
                Directive::Return
            }
        })
    }
}
