use std::time::Duration;

// Constants used for waiting in tests.
pub const SHORT_WAIT: Duration = Duration::from_micros(1);
pub const CHECK_WAIT: Duration = Duration::from_millis(10);
pub const LONG_WAIT: Duration = Duration::from_secs(10);

/// Slack allowed on top of an expected wall time before a timing assertion
/// fails. Generous, as CI machines are noisy.
pub const SCHEDULING_SLACK: Duration = Duration::from_millis(1_500);
