use std::thread;
use std::time::Duration;
use crate::resource::{measure, HeapSampler, MemorySample, MemorySampler, ScriptedSampler};
use crate::test_utils::CHECK_WAIT;

#[test]
fn delta_may_be_negative() {
    assert_eq!(1_024, MemorySample { before: 1_000, after: 2_024 }.delta());
    assert_eq!(-500, MemorySample { before: 1_500, after: 1_000 }.delta());
    assert_eq!(0, MemorySample { before: 7, after: 7 }.delta());
}

#[test]
fn measure_samples_around_closure() {
    let sampler = ScriptedSampler::new([100, 400]);
    let measured = measure(&sampler, || {
        thread::sleep(CHECK_WAIT);
        "done"
    });
    assert_eq!("done", measured.output);
    assert_eq!(MemorySample { before: 100, after: 400 }, measured.memory);
    assert_eq!(300, measured.memory.delta());
    assert!(measured.elapsed >= CHECK_WAIT);
    assert_eq!(1, sampler.reclaims());
}

#[test]
fn measure_tolerates_shrinking_heap() {
    let sampler = ScriptedSampler::new([4_096, 1_024]);
    let measured = measure(&sampler, || ());
    assert_eq!(-3_072, measured.memory.delta());
}

#[test]
fn scripted_sampler_repeats_last_reading() {
    let sampler = ScriptedSampler::new([1, 2]);
    assert_eq!(1, sampler.sample());
    assert_eq!(2, sampler.sample());
    assert_eq!(2, sampler.sample());
    assert_eq!(0, ScriptedSampler::default().sample());
}

#[test]
fn measure_accepts_trait_objects() {
    let sampler: &dyn MemorySampler = &ScriptedSampler::new([10, 20]);
    let measured = measure(sampler, || Duration::ZERO);
    assert_eq!(10, measured.memory.delta());
}

#[test]
fn heap_sampler_without_tracking_allocator_reads_zero() {
    // tests run on the system allocator
    assert_eq!(0, HeapSampler.sample());
}
