//! Scoring and projection throughput.
//!
//! Run with: `cargo bench --bench scoring`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use riadesk::data::catalog::{builtin_catalog, Category, Vendor};
use riadesk::data::goals::default_goals;
use riadesk::planning::{simulate_goals, PlanAssumptions};
use riadesk::scoring::{rank_vendors, score_catalog, WeightState};

/// Catalog-shaped input with `count` vendors, reusing the built-in categories.
fn synthetic_vendors(categories: &[Category], count: usize) -> Vec<Vendor> {
    (0..count)
        .map(|i| Vendor {
            name: format!("Vendor {i}"),
            scores: (0..categories.len())
                .map(|c| ((i * 7 + c * 3) % 10 + 1) as u8)
                .collect(),
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let catalog = builtin_catalog();
    let weights = WeightState::from_defaults(&catalog.categories);

    let mut group = c.benchmark_group("scoring");
    group.throughput(Throughput::Elements(catalog.vendors.len() as u64));
    group.bench_function("builtin_catalog", |b| {
        b.iter(|| score_catalog(black_box(&catalog), black_box(&weights)))
    });

    let vendors = synthetic_vendors(&catalog.categories, 1_000);
    group.throughput(Throughput::Elements(vendors.len() as u64));
    group.bench_function("rank_1000_vendors", |b| {
        b.iter(|| rank_vendors(black_box(&vendors), &catalog.categories, &weights))
    });
    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let goals = default_goals();
    let assumptions = PlanAssumptions::default();
    c.bench_function("simulate_default_goals", |b| {
        b.iter(|| simulate_goals(black_box(&goals), black_box(&assumptions)))
    });
}

criterion_group!(benches, bench_scoring, bench_projection);
criterion_main!(benches);
