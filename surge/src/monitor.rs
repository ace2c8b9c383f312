use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;
use crate::remedy;
use crate::remedy::Remedy;

/// What [`Monitor::enter`] should do after the closure has inspected the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Return,
    Wait(Duration),
    NotifyOne,
    NotifyAll,
}

/// Mutually exclusive state paired with a condition variable.
///
/// Every interaction goes through a closure that observes (and possibly
/// alters) the state, then returns a [`Directive`] telling the monitor whether
/// to return, wake waiters, or block until notified.
pub struct Monitor<S> {
    mutex: Mutex<S>,
    cond: Condvar,
}

impl<S: Default> Default for Monitor<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Monitor<S> {
    #[inline]
    pub fn new(s: S) -> Self {
        Self {
            mutex: Mutex::new(s),
            cond: Condvar::new(),
        }
    }

    /// Repeatedly evaluates `f` under the lock until it returns anything other
    /// than [`Directive::Wait`], or until a wait times out. The closure is
    /// re-evaluated after every wake-up, spurious or otherwise, so it should
    /// compute its wait duration from a [`Deadline`](crate::deadline::Deadline).
    ///
    /// The returned guard keeps the state locked.
    #[inline]
    pub fn enter<F: FnMut(&mut S) -> Directive>(&self, mut f: F) -> MutexGuard<'_, S> {
        let mut guard = self.mutex.lock().remedy();
        loop {
            match f(&mut *guard) {
                Directive::Return => return guard,
                Directive::Wait(duration) => {
                    let (reacquired, timed_out) = remedy::cond_wait_remedy(&self.cond, guard, duration);
                    guard = reacquired;
                    if timed_out {
                        return guard;
                    }
                }
                Directive::NotifyOne => {
                    self.cond.notify_one();
                    return guard;
                }
                Directive::NotifyAll => {
                    self.cond.notify_all();
                    return guard;
                }
            }
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.mutex.lock().remedy()
    }

}

impl<S: fmt::Debug> fmt::Debug for Monitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Monitor");
        match self.mutex.try_lock() {
            Ok(guard) => {
                d.field("data", &*guard);
            }
            Err(_) => {
                d.field("data", &format_args!("<locked>"));
            }
        }
        d.finish_non_exhaustive()
    }
}
