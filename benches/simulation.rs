//! Benchmarks for the Monte Carlo driver and its estimators.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regsim::prelude::*;

fn bench_ols_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_fit");

    for size in [100, 1000, 10000].iter() {
        let data = LinearDgp::new().generate(0, *size).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model = LinearRegression::new();
                model.fit(black_box(&data.x), black_box(&data.y)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_forest_fit");
    group.sample_size(10);

    for size in [100, 1000, 5000].iter() {
        let data = NonLinearDgp::new().generate(0, *size).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut forest = RandomForestRegressor::new(10).with_random_state(0);
                forest.fit(black_box(&data.x), black_box(&data.y)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    group.sample_size(10);

    for (name, adapter) in [
        ("ols", MethodKind::Ols.build()),
        ("forest_cv", MethodKind::Forest.build()),
    ] {
        group.bench_with_input(BenchmarkId::new(name, 500), &adapter, |b, adapter| {
            b.iter(|| {
                let mut sim =
                    MonteCarloSimulation::new(Box::new(NonLinearDgp::new()), vec![100, 500])
                        .unwrap();
                sim.simulate(adapter.as_ref(), black_box(2), Evaluation::Rss)
                    .unwrap();
                sim.into_results()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ols_fit, bench_forest_fit, bench_simulate);
criterion_main!(benches);
