//! Criterion benchmarks for the filter pipeline.

use std::hint::black_box;

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use facetrank::criteria::SortKey;
use facetrank::facets::FacetIndexer;
use facetrank::record::facet;
use facetrank::{FilterCriteria, FilterPipeline, Opportunity, apply};

const USES: [&str; 8] = [
    "Solar",
    "Roof Repair",
    "Flood Protection",
    "Energy Audit",
    "Storm Mitigation",
    "Insulation",
    "Wind",
    "Water Heater",
];
const KINDS: [&str; 4] = ["grant", "rebate", "loan", "tax-credit"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn synthetic_grants(n: usize) -> Vec<Opportunity> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let offset = i64::try_from(i % 540).unwrap();
            let opens = base + Duration::days(offset);
            let closes = opens + Duration::days(30 + offset % 200);
            Opportunity::new(format!("g-{i}"), format!("Programme {i} {}", USES[i % USES.len()]))
                .with_description("Assistance for homeowners improving resilience")
                .with_window(Some(opens), Some(closes))
                .nationwide(i % 7 == 0)
                .with_kind(KINDS[i % KINDS.len()])
                .with_uses([USES[i % USES.len()], USES[(i * 3) % USES.len()]])
                .with_requirements((0..i % 4).map(|r| format!("Requirement {r}")))
        })
        .collect()
}

fn busy_criteria() -> FilterCriteria {
    FilterCriteria::new()
        .with_search("programme")
        .with_status("open")
        .select(facet::USES, ["Solar", "Wind", "Insulation"])
        .with_min_score(70.0)
        .with_sort(SortKey::TitleAsc)
}

fn pipeline_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_apply");

    for size in [100usize, 1_000, 10_000] {
        let grants = synthetic_grants(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("default", size), &grants, |b, grants| {
            let criteria = FilterCriteria::default();
            b.iter(|| apply(black_box(grants), &criteria, now()));
        });

        group.bench_with_input(BenchmarkId::new("busy", size), &grants, |b, grants| {
            let criteria = busy_criteria();
            b.iter(|| apply(black_box(grants), &criteria, now()));
        });
    }

    group.finish();
}

fn cached_pipeline_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_cached");

    for size in [100usize, 1_000, 10_000] {
        let pipeline = FilterPipeline::new(synthetic_grants(size));
        let criteria = busy_criteria();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::new("run", size), |b| {
            b.iter(|| pipeline.run(black_box(&criteria), now()));
        });
    }

    group.finish();
}

fn facet_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("facet_index");

    for size in [100usize, 1_000, 10_000] {
        let grants = synthetic_grants(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("index", size), &grants, |b, grants| {
            b.iter(|| FacetIndexer::index(black_box(grants)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    pipeline_benchmarks,
    cached_pipeline_benchmarks,
    facet_benchmarks
);
criterion_main!(benches);
