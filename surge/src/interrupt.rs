use std::time::Duration;
use tokio::sync::Notify;
use crate::deadline::Deadline;
use crate::monitor::{Directive, Monitor};

/// A one-way cancellation signal shared between a strategy and the units it
/// runs. Blocking waiters park on a condition variable; async waiters are woken
/// through a [`Notify`]. Once raised, it stays raised.
#[derive(Debug, Default)]
pub struct Interrupt {
    raised: Monitor<bool>,
    notify: Notify,
}

impl Interrupt {
    /// Raises the interrupt, waking every waiter. Returns `true` if this call
    /// raised it, `false` if it was already raised.
    pub fn raise(&self) -> bool {
        let mut raised_now = false;
        drop(self.raised.enter(|raised| {
            if *raised {
                Directive::Return
            } else {
                *raised = true;
                raised_now = true;
                Directive::NotifyAll
            }
        }));
        if raised_now {
            self.notify.notify_waiters();
        }
        raised_now
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        *self.raised.lock()
    }

    /// Blocks the calling thread for `duration`, returning early if the
    /// interrupt is raised. Returns `true` if interrupted.
    ///
    /// Never returns `false` before `duration` has fully elapsed.
    pub fn wait_for(&self, duration: Duration) -> bool {
        let mut deadline = Deadline::lazy_after(duration);
        let raised = self.raised.enter(|raised| {
            if *raised {
                Directive::Return
            } else {
                Directive::Wait(deadline.remaining())
            }
        });
        *raised
    }

    /// Resolves once the interrupt has been raised.
    pub async fn raised(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // register before checking, so a raise in between is not missed
            notified.as_mut().enable();
            if self.is_raised() {
                return;
            }
            notified.await;
        }
    }
}
