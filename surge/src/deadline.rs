use std::time::{Duration, Instant};

/// A point in time by which something must happen, possibly initialised on
/// first use so that a deadline which is never consulted costs no clock read.
#[derive(Debug, Clone, Copy)]
pub enum Deadline {
    Point(Instant),
    Forever,
    Uninitialized(Duration),
    Elapsed,
}

impl Deadline {
    #[inline(always)]
    pub fn lazy_after(duration: Duration) -> Self {
        Self::Uninitialized(duration)
    }

    #[inline(always)]
    pub fn after(duration: Duration) -> Self {
        let mut deadline = Self::lazy_after(duration);
        deadline.ensure_initialized();
        deadline
    }

    #[inline(always)]
    fn ensure_initialized(&mut self) {
        if let Self::Uninitialized(duration) = *self {
            *self = if duration == Duration::MAX {
                Deadline::Forever
            } else if duration.is_zero() {
                Deadline::Elapsed
            } else {
                match Instant::now().checked_add(duration) {
                    None => Deadline::Forever,
                    Some(instant) => Deadline::Point(instant),
                }
            };
        }
    }

    /// Time left until the deadline; zero once it has passed.
    #[inline(always)]
    pub fn remaining(&mut self) -> Duration {
        self.ensure_initialized();
        match self {
            Deadline::Point(instant) => instant.saturating_duration_since(Instant::now()),
            Deadline::Forever => Duration::MAX,
            Deadline::Elapsed | Deadline::Uninitialized(_) => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests;
