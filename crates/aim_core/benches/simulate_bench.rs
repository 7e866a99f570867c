use aim_core::{aggregate, analyze, simulate, BehaviorConfig, PatternSpec, RecordMode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_simulate(c: &mut Criterion) {
    let targets = PatternSpec::back_and_forth(100.0, 0.125, 60).generate();
    let config = BehaviorConfig::default();

    c.bench_function("simulate_hits_only_60_targets", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            simulate(black_box(&targets), &config, RecordMode::HitsOnly, &mut rng).unwrap()
        })
    });

    c.bench_function("simulate_full_trace_60_targets", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            simulate(black_box(&targets), &config, RecordMode::FullTrace, &mut rng).unwrap()
        })
    });

    c.bench_function("simulate_analyze_aggregate", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            let replay = simulate(&targets, &config, RecordMode::HitsOnly, &mut rng).unwrap();
            let samples = analyze(&targets, &replay).unwrap();
            black_box(aggregate(&samples))
        })
    });
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
