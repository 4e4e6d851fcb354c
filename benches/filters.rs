//! Filter 与导出路径性能基准测试

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;

use metricsreporter::config::ReporterConfig;
use metricsreporter::filters::{MetricFilter, PrefixFilter, RegexFilter, resolve_filter};
use metricsreporter::registry::{InMemoryRegistry, MetricRegistry, MetricValue};

fn metric_names(count: usize) -> Vec<String> {
    let groups = ["http.requests", "db.query", "cache.hits", "process.uptime"];
    (0..count)
        .map(|i| format!("{}.{}", groups[i % groups.len()], i))
        .collect()
}

// ============== should_report 基准测试 ==============

fn bench_should_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters/should_report");
    let names = metric_names(256);
    let value = MetricValue::Counter(1);

    let regex = RegexFilter::with_expression(r"^(http|db)\.").unwrap();
    group.bench_function("regex", |b| {
        b.iter(|| {
            names
                .iter()
                .filter(|n| regex.should_report(black_box(n), &value))
                .count()
        });
    });

    let prefix = PrefixFilter::with_prefixes(["http.", "db."]);
    group.bench_function("prefix", |b| {
        b.iter(|| {
            names
                .iter()
                .filter(|n| prefix.should_report(black_box(n), &value))
                .count()
        });
    });

    group.finish();
}

// ============== resolve_filter 基准测试 ==============

fn bench_resolve_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters/resolve");

    let none = ReporterConfig::empty();
    group.bench_function("no_filter", |b| {
        b.iter(|| resolve_filter(black_box(&none)).unwrap());
    });

    let regex = ReporterConfig::from_value(json!({
        "filter": { "class": "regex", "expression": r"^http\.requests\.\d+$" }
    }))
    .unwrap();
    group.bench_function("regex", |b| {
        b.iter(|| resolve_filter(black_box(&regex)).unwrap());
    });

    group.finish();
}

// ============== registry snapshot 基准测试 ==============

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/snapshot");

    for size in [16, 256, 4096] {
        let registry = Arc::new(InMemoryRegistry::new());
        for (i, name) in metric_names(size).iter().enumerate() {
            match i % 3 {
                0 => registry.inc_counter(name, 1),
                1 => registry.set_gauge(name, i as f64),
                _ => registry.record_duration(name, Duration::from_micros(i as u64)),
            }
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &registry, |b, r| {
            b.iter(|| r.snapshot().len());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_should_report,
    bench_resolve_filter,
    bench_snapshot
);
criterion_main!(benches);
