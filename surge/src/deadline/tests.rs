use std::thread;
use std::time::Duration;
use crate::deadline::Deadline;

#[test]
fn zero_duration_is_elapsed() {
    let mut deadline = Deadline::after(Duration::ZERO);
    assert!(matches!(deadline, Deadline::Elapsed));
    assert!(deadline.remaining().is_zero());
    assert_eq!(Duration::ZERO, deadline.remaining());
}

#[test]
fn max_duration_is_forever() {
    let mut deadline = Deadline::lazy_after(Duration::MAX);
    assert_eq!(Duration::MAX, deadline.remaining());
    assert!(matches!(deadline, Deadline::Forever));
    assert!(!deadline.remaining().is_zero());
}

#[test]
fn lazy_deadline_starts_on_first_use() {
    let mut deadline = Deadline::lazy_after(Duration::from_millis(50));
    assert!(matches!(deadline, Deadline::Uninitialized(_)));
    thread::sleep(Duration::from_millis(60));

    // the clock only starts now, so plenty of time should remain
    let remaining = deadline.remaining();
    assert!(remaining > Duration::from_millis(20), "remaining {remaining:?}");
    assert!(remaining <= Duration::from_millis(50));
}

#[test]
fn point_deadline_runs_out() {
    let mut deadline = Deadline::after(Duration::from_millis(10));
    assert!(!deadline.remaining().is_zero());
    thread::sleep(Duration::from_millis(20));
    assert!(deadline.remaining().is_zero());
    assert_eq!(Duration::ZERO, deadline.remaining());
}
