use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pennant_trends::aggregate::aggregate;
use pennant_trends::chart::ChartModel;
use pennant_trends::dataset::{EraBounds, normalize};
use pennant_trends::filter::FilterState;
use pennant_trends::metrics::MetricMode;
use pennant_trends::sample_data::sample_rows;

fn bench_normalize(c: &mut Criterion) {
    let rows = sample_rows();
    let era = EraBounds {
        min_year: 1960,
        max_year: 2015,
    };
    c.bench_function("normalize_sample_rows", |b| {
        b.iter(|| normalize(black_box(&rows), black_box(&era)).unwrap())
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let rows = sample_rows();
    let era = EraBounds {
        min_year: 1960,
        max_year: 2015,
    };
    let dataset = normalize(&rows, &era).unwrap();
    let mut filter = FilterState::new(&dataset);
    filter.set_metric_mode(MetricMode::Combined);

    c.bench_function("aggregate_combined_full_era", |b| {
        b.iter(|| aggregate(black_box(&dataset), black_box(&filter)))
    });

    c.bench_function("chart_model_build", |b| {
        b.iter(|| ChartModel::build(black_box(&dataset), black_box(&filter)))
    });
}

criterion_group!(benches, bench_normalize, bench_aggregate);
criterion_main!(benches);
