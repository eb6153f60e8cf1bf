//! Profiling, statistics and chart shaping over an ingested dataset.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tabular_insight::analysis::{chart, statistics, summary, ChartConfig, ChartType};
use tabular_insight::dataset::Dataset;
use tabular_insight::ingestion::{ingest, IngestionOptions};

fn dataset(rows: usize, numeric_columns: usize) -> Dataset {
    let mut out = String::from("label");
    for c in 0..numeric_columns {
        out.push_str(&format!(",m{c}"));
    }
    out.push('\n');
    for i in 0..rows {
        out.push_str(&format!("row_{i}"));
        for c in 0..numeric_columns {
            out.push_str(&format!(",{}", (i * (c + 3)) % 997));
        }
        out.push('\n');
    }
    ingest("bench.csv", out.as_bytes(), "csv", &IngestionOptions::default())
        .expect("bench input is valid")
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    for cols in [2usize, 8, 16] {
        let ds = dataset(10_000, cols);
        group.bench_with_input(BenchmarkId::new("columns", cols), &ds, |b, ds| {
            b.iter(|| statistics(black_box(ds)))
        });
    }
    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let ds = dataset(10_000, 8);
    c.bench_function("summary/10k_rows_8_cols", |b| b.iter(|| summary(black_box(&ds))));
}

fn bench_charts(c: &mut Criterion) {
    let ds = dataset(10_000, 4);
    let config = ChartConfig::default();
    let mut group = c.benchmark_group("chart");
    for kind in [ChartType::Bar, ChartType::Pie, ChartType::Bubble] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter(|| chart(black_box(&ds), kind, &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_statistics, bench_summary, bench_charts);
criterion_main!(benches);
