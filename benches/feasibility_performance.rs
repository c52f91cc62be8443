//! Performance benchmarks for the feasibility calculator
//!
//! The calculator runs on every keystroke of the parameters form, and the
//! report walks every stored record, so both are measured here.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use field_monitoring::application::{ParameterReport, ParameterService};
use field_monitoring::domain::{compute_derived, ActivityCategory, ParameterDraft, ParameterForm};
use field_monitoring::infrastructure::InMemoryParameterRepository;
use std::hint::black_box;
use std::sync::Arc;

fn bench_compute_derived(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_derived");

    group.bench_function("default_feasibility", |b| {
        let draft = ParameterDraft::new(6, 2, 101);
        b.iter(|| black_box(compute_derived(black_box(draft))));
    });

    group.bench_function("with_shortfall", |b| {
        let draft = ParameterDraft::new(12, 3, 156).with_feasible_sites(30);
        b.iter(|| black_box(compute_derived(black_box(draft))));
    });

    group.bench_function("incomplete", |b| {
        let draft = ParameterDraft {
            number_of_sites: None,
            ..ParameterDraft::new(12, 3, 156)
        };
        b.iter(|| black_box(compute_derived(black_box(draft))));
    });

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("parameter_report");
    let runtime = tokio::runtime::Runtime::new().expect("runtime should start");

    for count in [10u32, 100, 1_000] {
        let records = runtime.block_on(async {
            let service = ParameterService::new(Arc::new(InMemoryParameterRepository::new()));
            for i in 0..count {
                let form = ParameterForm {
                    csp_activity_number: format!("CSP{i:04}"),
                    field_office: "Aden".to_string(),
                    activity_category: ActivityCategory::Livelihoods,
                    draft: ParameterDraft::new(12, i64::from(i % 5 + 1), i64::from(i + 10))
                        .with_feasible_sites(i64::from(i % 20)),
                };
                service.create(form).await.expect("fixture form is valid");
            }
            service.list().await.expect("in-memory list cannot fail")
        });

        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(ParameterReport::from_records(black_box(records))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_derived, bench_report);
criterion_main!(benches);
