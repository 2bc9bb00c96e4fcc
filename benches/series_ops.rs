//! Time series engine benchmarks
//!
//! Measures the grouping, filtering, and bulk update paths over a full
//! 8760-hour model year of hourly samples.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use zephyr_ts::{AnalysisPeriod, Header, Sample, TimeSeries, Timestamp};

// =============================================================================
// Test Data Generators
// =============================================================================

/// A full model year of hourly samples with a temperature-like daily cycle
fn full_year_series() -> TimeSeries {
    let data = (1..=8760u32)
        .map(|hoy| {
            let hour = ((hoy - 1) % 24) as f64;
            let value = 10.0 + 10.0 * (hour / 24.0) + (hoy % 7) as f64;
            Sample::new(
                value,
                Timestamp::from_hour_of_year(hoy).expect("valid hour of year"),
            )
        })
        .collect();
    TimeSeries::new(data, Header::default())
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_grouping(c: &mut Criterion) {
    let series = full_year_series();

    c.bench_function("group_by_month/8760", |b| {
        b.iter(|| black_box(series.group_by_month()))
    });

    c.bench_function("group_by_day/8760", |b| {
        b.iter(|| black_box(series.group_by_day()))
    });

    c.bench_function("average_monthly_per_hour/8760", |b| {
        b.iter(|| black_box(series.average_monthly_per_hour()))
    });
}

fn bench_filtering(c: &mut Criterion) {
    let series = full_year_series();
    let summer = AnalysisPeriod::new(6, 1, 1, 8, 31, 24).expect("valid period");

    c.bench_function("filter_by_analysis_period/8760", |b| {
        b.iter(|| black_box(series.filter_by_analysis_period(Some(&summer))))
    });

    c.bench_function("filter_by_statement/8760", |b| {
        b.iter(|| {
            black_box(
                series
                    .filter_by_statement("x > 15 and x % 2 == 0")
                    .expect("valid statement"),
            )
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let replacement: Vec<f64> = (0..8760).map(|i| i as f64).collect();

    c.bench_function("update_for_analysis_period/8760", |b| {
        b.iter_batched(
            full_year_series,
            |mut series| {
                series
                    .update_for_analysis_period(&replacement, None)
                    .expect("update succeeds")
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_grouping, bench_filtering, bench_update);
criterion_main!(benches);
