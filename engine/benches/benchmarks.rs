//! Performance benchmarks for medbox-engine

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use medbox_engine::{snapshot, Document, NewRecord, RecordPatch, Store, Tab};

fn populated_store(size: u64) -> Store {
    let mut store = Store::new();
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().date_naive();

    for i in 0..size {
        let mut fields = NewRecord::new(format!("Medicine {i}"))
            .brand(format!("Brand {}", i % 17))
            .notes("take with water")
            .qty(u32::try_from(i % 12).unwrap_or(0))
            .low(3)
            .expiry(base + Duration::days(i64::try_from(i % 400).unwrap_or(0)));
        if i % 3 == 0 {
            fields = fields.category("pain");
        }
        store.add_record(fields, 1000);
    }

    store
}

fn bench_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_operations");

    group.bench_function("add_record", |b| {
        let mut store = Store::new();
        b.iter(|| {
            let fields = NewRecord::new("Aspirin").qty(10);
            store.add_record(black_box(fields), black_box(1000))
        })
    });

    group.bench_function("update_record", |b| {
        let mut store = populated_store(1000);
        let id = store.records()[500].id.clone();
        let mut qty = 0u32;

        b.iter(|| {
            qty = qty.wrapping_add(1);
            store.update_record(black_box(&id), RecordPatch::new().qty(qty))
        })
    });

    group.bench_function("delete_category", |b| {
        let store = populated_store(1000);
        b.iter(|| {
            let mut store = store.clone();
            store.delete_category(black_box("pain"))
        })
    });

    group.finish();
}

fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

    for size in [100u64, 1000, 10000].iter() {
        let store = populated_store(*size);

        group.bench_with_input(BenchmarkId::new("expiring", size), size, |b, _| {
            b.iter(|| store.visible(black_box(&Tab::Expiring), "", now).len())
        });

        group.bench_with_input(BenchmarkId::new("search", size), size, |b, _| {
            b.iter(|| store.visible(&Tab::All, black_box("brand 7"), now).len())
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    for size in [100u64, 1000].iter() {
        let store = populated_store(*size);
        let document = store.to_document();
        let json = document.to_json().unwrap();
        let records_json = snapshot::encode_records(store.records()).unwrap();

        group.bench_with_input(BenchmarkId::new("document_to_json", size), size, |b, _| {
            b.iter(|| black_box(&document).to_json())
        });

        group.bench_with_input(BenchmarkId::new("document_from_json", size), size, |b, _| {
            b.iter(|| Document::from_json(black_box(&json)))
        });

        group.bench_with_input(BenchmarkId::new("snapshot_decode", size), size, |b, _| {
            b.iter(|| snapshot::decode_records(black_box(&records_json)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_store_operations,
    bench_views,
    bench_serialization,
);
criterion_main!(benches);
