use std::sync::{Condvar, LockResult, MutexGuard};
use std::time::Duration;

/// Unpacks a lock result, extracting the guarded data whether or not the lock
/// was poisoned.
///
/// A worker that panics mid-unit poisons whatever it held. The state guarded
/// in this crate is always left consistent between statements, so the
/// remaining threads carry on rather than cascading the panic.
pub trait Remedy<T> {
    fn remedy(self) -> T;
}

impl<T> Remedy<T> for LockResult<T> {
    #[inline(always)]
    fn remedy(self) -> T {
        self.unwrap_or_else(|error| error.into_inner())
    }
}

/// Waits on `cond` for up to `duration`, returning the reacquired guard and
/// whether the wait timed out. A zero duration never blocks; [`Duration::MAX`]
/// waits without a timeout.
#[inline(always)]
pub fn cond_wait_remedy<'a, T>(
    cond: &Condvar,
    guard: MutexGuard<'a, T>,
    duration: Duration,
) -> (MutexGuard<'a, T>, bool) {
    if duration.is_zero() {
        (guard, true)
    } else if duration == Duration::MAX {
        (cond.wait(guard).remedy(), false)
    } else {
        let (guard, result) = cond.wait_timeout(guard, duration).remedy();
        (guard, result.timed_out())
    }
}
