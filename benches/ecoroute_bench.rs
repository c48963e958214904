//! Criterion benchmarks for ev-ecoroute.
//!
//! Uses synthetic square grids of stations 8 km apart, so every station
//! has a handful of neighbours within the default 20 km threshold.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ev_ecoroute::planner::{optimize_route_with, OptimizeOptions};
use ev_ecoroute::{build_network, shortest_path, CostModel, GaConfig, Route, Station, StationCatalog};

// degrees per 8 km on the equator
const STEP: f64 = 8.0 / 111.194_926_644_558_74;

fn grid(side: usize) -> StationCatalog {
    let stations = (0..side * side)
        .map(|i| {
            Station::new(
                format!("S{i}"),
                STEP * (i / side) as f64,
                STEP * (i % side) as f64,
                7.0,
                0.3,
            )
            .with_usage_count((i * 37 % 500) as u32)
        })
        .collect();
    StationCatalog::new(stations).expect("grid names are unique")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_build_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_network");
    group.sample_size(10);

    for side in [10usize, 30, 50] {
        let catalog = grid(side);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &catalog, |b, cat| {
            b.iter(|| black_box(build_network(black_box(cat), 20.0)))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let catalog = grid(10);
    let network = build_network(&catalog, 20.0);
    let model = CostModel::default();
    // zig-zag along the first two rows
    let route = Route::new(vec![0, 10, 1, 11, 2, 12, 3, 13, 4, 14]);
    let departure = NaiveDate::from_ymd_opt(2018, 3, 5)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid timestamp");

    c.bench_function("evaluate_route_10_stops", |b| {
        b.iter(|| black_box(model.evaluate(black_box(&route), &network, &catalog, departure)))
    });
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_route");
    group.sample_size(10);

    let departure = NaiveDate::from_ymd_opt(2018, 3, 5)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid timestamp");

    for (side, pop, gen) in [(5usize, 50usize, 30usize), (10, 100, 50)] {
        let catalog = grid(side);
        let network = build_network(&catalog, 20.0);
        let model = CostModel::default();
        let config = GaConfig::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_seed(42);
        let end = format!("S{}", side * side - 1);

        group.bench_function(format!("n{}_p{}_g{}", side * side, pop, gen), |b| {
            b.iter(|| {
                let result = optimize_route_with(
                    "S0",
                    &end,
                    &catalog,
                    &network,
                    &model,
                    black_box(&config),
                    OptimizeOptions::default().with_departure(departure),
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_shortest_path(c: &mut Criterion) {
    let catalog = grid(30);
    let network = build_network(&catalog, 20.0);

    c.bench_function("shortest_path_900", |b| {
        b.iter(|| black_box(shortest_path(&network, &catalog, "S0", "S899")))
    });
}

criterion_group!(
    benches,
    bench_build_network,
    bench_evaluate,
    bench_optimize,
    bench_shortest_path
);
criterion_main!(benches);
