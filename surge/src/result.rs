use std::fmt;
use std::time::Duration;

/// How many execution contexts a strategy may occupy at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextCount {
    Fixed(usize),
    Unbounded,
    Lightweight,
}

impl fmt::Display for ContextCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ContextCount::Fixed(n) => n.to_string(),
            ContextCount::Unbounded => "unbounded".to_owned(),
            ContextCount::Lightweight => "lightweight".to_owned(),
        };
        f.pad(&text)
    }
}

/// The outcome of running one batch under one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    strategy_name: String,
    duration: Duration,
    completed: usize,
    submitted: usize,
    contexts: ContextCount,
}

impl BatchResult {
    pub fn new(strategy_name: impl Into<String>, duration: Duration, completed: usize, submitted: usize, contexts: ContextCount) -> Self {
        debug_assert!(completed <= submitted);
        Self {
            strategy_name: strategy_name.into(),
            duration,
            completed,
            submitted,
            contexts,
        }
    }

    /// A zeroed result for a run that could not be carried out.
    pub fn failed(strategy_name: impl Into<String>, submitted: usize, contexts: ContextCount) -> Self {
        Self::new(strategy_name, Duration::ZERO, 0, submitted, contexts)
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn contexts(&self) -> ContextCount {
        self.contexts
    }

    /// Completed units per second of wall time. Zero if nothing completed.
    pub fn throughput(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else if self.duration.is_zero() {
            f64::INFINITY
        } else {
            self.completed as f64 / self.duration.as_secs_f64()
        }
    }

    /// `true` if fewer units completed than were submitted.
    pub fn is_partial(&self) -> bool {
        self.completed < self.submitted
    }
}
