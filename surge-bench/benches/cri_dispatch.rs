use std::time::Duration;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use surge::dispatch;
use surge::strategy::{StrategyOptions, StrategySpec};

fn criterion_benchmark(c: &mut Criterion) {
    let opts = StrategyOptions::default();

    for capacity in [1, 4, 16] {
        let strategy = StrategySpec::bounded(capacity).unwrap().build(&opts).unwrap();
        c.bench_function(&format!("run_batch(bounded, capacity={capacity}, units=100)"), |b| {
            b.iter(|| {
                let result = dispatch::run_batch(&*strategy, 100, Duration::ZERO, Duration::MAX).unwrap();
                black_box(result);
            });
        });
    }

    let strategy = StrategySpec::lightweight().build(&opts).unwrap();
    c.bench_function("run_batch(lightweight, units=100)", |b| {
        b.iter(|| {
            let result = dispatch::run_batch(&*strategy, 100, Duration::ZERO, Duration::MAX).unwrap();
            black_box(result);
        });
    });

    let strategy = StrategySpec::unbounded().build(&opts).unwrap();
    c.bench_function("run_batch(unbounded, units=10)", |b| {
        b.iter(|| {
            let result = dispatch::run_batch(&*strategy, 10, Duration::ZERO, Duration::MAX).unwrap();
            black_box(result);
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
