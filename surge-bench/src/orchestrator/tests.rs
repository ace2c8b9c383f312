use std::time::Duration;
use surge::resource::ScriptedSampler;
use surge::result::ContextCount;
use surge::strategy::{StrategyKind, StrategySpec};
use surge::Error;
use crate::orchestrator::{self, Run, Sweep, FULL_UNITS, QUICK_UNITS};

fn tiny_sweep() -> Sweep {
    let mut sweep = Sweep::across_all(20, orchestrator::QUICK_CAPACITY);
    sweep.delay = Duration::from_millis(1);
    sweep
}

#[test]
fn presets_cover_every_strategy() {
    for (sweep, units, capacity) in [(Sweep::quick(), QUICK_UNITS, 50), (Sweep::full(), FULL_UNITS, 200)] {
        let kinds = sweep.runs.iter().map(|run| run.spec.kind()).collect::<Vec<_>>();
        assert_eq!(vec![StrategyKind::Bounded, StrategyKind::Unbounded, StrategyKind::Lightweight], kinds);
        assert!(sweep.runs.iter().all(|run| run.units == units));
        assert_eq!(ContextCount::Fixed(capacity), sweep.runs[0].spec.contexts());
        assert_eq!(Duration::from_millis(100), sweep.delay);
    }
}

#[test]
fn reports_follow_configuration_order() {
    let mut sweep = tiny_sweep();
    sweep.runs.reverse();
    sweep.runs.push(Run {
        spec: StrategySpec::bounded(3).unwrap(),
        units: 7,
    });

    let reports = orchestrator::run(&sweep, &ScriptedSampler::new([1_000, 3_000]));
    assert_eq!(4, reports.len());
    for (run, report) in sweep.runs.iter().zip(&reports) {
        assert!(!report.is_failure(), "{:?}", report.failure);
        assert_eq!(run.spec.contexts(), report.result.contexts());
        assert_eq!(run.units, report.result.completed());
        assert_eq!(run.spec.label(&sweep.strategy_opts), report.result.strategy_name());
    }
    // the sampler repeats its last reading after the first run
    assert_eq!(2_000, reports[0].memory.unwrap().delta());
    assert_eq!(0, reports[1].memory.unwrap().delta());
}

#[test]
fn build_failure_is_isolated() {
    let sweep = tiny_sweep();
    let sampler = ScriptedSampler::default();
    let reports = orchestrator::run_with(&sweep, &sampler, |run| match run.spec.kind() {
        StrategyKind::Unbounded => Err(Error::InvalidConfig("refused".into())),
        _ => run.spec.build(&sweep.strategy_opts),
    });

    assert_eq!(3, reports.len());
    assert!(!reports[0].is_failure());
    assert!(reports[1].is_failure());
    assert!(reports[1].failure.as_deref().unwrap().contains("refused"));
    assert_eq!(0, reports[1].result.completed());
    assert_eq!(20, reports[1].result.submitted());
    assert!(reports[1].memory.is_none());
    assert!(!reports[2].is_failure());
    assert_eq!(20, reports[2].result.completed());
}

#[test]
fn closed_strategy_is_isolated() {
    let sweep = tiny_sweep();
    let sampler = ScriptedSampler::default();
    let reports = orchestrator::run_with(&sweep, &sampler, |run| {
        let mut strategy = run.spec.build(&sweep.strategy_opts)?;
        if run.spec.kind() == StrategyKind::Bounded {
            strategy.shutdown();
        }
        Ok(strategy)
    });

    assert!(reports[0].is_failure());
    assert!(reports[0].result.is_partial());
    assert_eq!(ContextCount::Fixed(50), reports[0].result.contexts());
    // the batch was measured before it failed
    assert!(reports[0].memory.is_some());
    assert!(reports[1..].iter().all(|report| !report.is_failure() && !report.result.is_partial()));
}

#[test]
fn timed_out_run_is_recorded_not_failed() {
    let mut sweep = tiny_sweep();
    sweep.delay = Duration::from_secs(5);
    sweep.timeout = Duration::from_millis(20);
    sweep.runs.truncate(1);

    let reports = orchestrator::run(&sweep, &ScriptedSampler::default());
    assert_eq!(1, reports.len());
    assert!(!reports[0].is_failure());
    assert!(reports[0].result.is_partial());
    assert_eq!(0, reports[0].result.completed());
    assert!(reports[0].memory.is_some());
}

#[test]
fn every_run_receives_reclaim_hint() {
    let sweep = tiny_sweep();
    let sampler = ScriptedSampler::default();
    orchestrator::run(&sweep, &sampler);
    assert_eq!(3, sampler.reclaims());
}

#[test]
fn timed_out_sweep_is_not_a_hard_failure() {
    let mut sweep = tiny_sweep();
    sweep.delay = Duration::from_secs(5);
    sweep.timeout = Duration::from_millis(20);
    sweep.runs.truncate(2);

    let reports = orchestrator::run(&sweep, &ScriptedSampler::default());
    assert!(reports.iter().all(|report| report.result.is_partial()));
    assert!(orchestrator::outcome(&reports).is_ok());
}

#[test]
fn partly_failed_sweep_is_not_a_hard_failure() {
    let sweep = tiny_sweep();
    let reports = orchestrator::run_with(&sweep, &ScriptedSampler::default(), |run| match run.spec.kind() {
        StrategyKind::Lightweight => run.spec.build(&sweep.strategy_opts),
        _ => Err(Error::InvalidConfig("refused".into())),
    });
    assert_eq!(2, reports.iter().filter(|report| report.is_failure()).count());
    assert!(orchestrator::outcome(&reports).is_ok());
}

#[test]
fn wholly_failed_sweep_is_a_hard_failure() {
    let sweep = tiny_sweep();
    let reports = orchestrator::run_with(&sweep, &ScriptedSampler::default(), |_| {
        Err(Error::InvalidConfig("refused".into()))
    });
    assert!(reports.iter().all(|report| report.is_failure()));
    assert!(orchestrator::outcome(&reports).is_err());
    assert!(orchestrator::outcome(&[]).is_ok());
}
