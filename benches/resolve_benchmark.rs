//! Benchmarks for resolution and scanning.
//!
//! Run with: cargo bench --bench resolve_benchmark

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use eol_scanner::model::ProductData;
use eol_scanner::{
    CatalogStore, ComponentDescriptor, Cycle, Identifier, Inventory, LookupTables, Milestone,
    ScanOptions, Scanner, Resolver, evaluate_at,
};
use std::hint::black_box;

/// Build a catalog with `count` products, each with a PURL, a CPE and a few cycles.
fn build_catalog(count: usize) -> CatalogStore {
    let store = CatalogStore::in_memory().unwrap();
    for i in 0..count {
        let name = format!("product-{i}");
        let id = store
            .upsert_product(&ProductData::new(&name).with_aliases([format!("alias-{i}")]))
            .unwrap();
        store
            .upsert_identifiers(
                id,
                &[
                    Identifier::purl(format!("pkg:generic/{name}")),
                    Identifier::cpe(format!("cpe:2.3:a:vendor:{name}")),
                ],
            )
            .unwrap();
        for major in 1..=4 {
            let cycle = Cycle::new(format!("{major}.0"))
                .with_release_date(format!("20{:02}-01-01", 10 + major))
                .with_eol(Milestone::Date(format!("20{:02}-01-01", 20 + major)));
            store.upsert_cycle(id, &cycle).unwrap();
        }
    }
    store
}

/// Components that hit each strategy tier in turn, plus misses.
fn components(count: usize) -> Vec<ComponentDescriptor> {
    (0..count)
        .map(|i| {
            let name = format!("product-{i}");
            match i % 4 {
                0 => ComponentDescriptor::new(&name, "2.0.1")
                    .with_purl(format!("pkg:generic/{name}@2.0.1")),
                1 => ComponentDescriptor::new(&name, "3.1").with_kind("binary"),
                2 => ComponentDescriptor::new(format!("alias-{i}"), "1.4"),
                _ => ComponentDescriptor::new(format!("unknown-{i}"), "0.1"),
            }
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let store = build_catalog(500);
    let tables = LookupTables::builtin();
    let resolver = Resolver::new(&store, &tables);
    let inputs = components(100);

    c.bench_function("resolve_100_components", |b| {
        b.iter(|| {
            for component in &inputs {
                let _ = black_box(resolver.resolve(black_box(component)));
            }
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let store = build_catalog(1);
    let cycles = store.cycles_for_product("product-0").unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    c.bench_function("evaluate_cycle", |b| {
        b.iter(|| black_box(evaluate_at(black_box(&cycles), black_box("3.9.1"), 90, today)))
    });
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let store = build_catalog(500);
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    for size in [100, 1000] {
        let inventory = Inventory {
            components: components(size),
            ..Inventory::default()
        };
        let scanner = Scanner::new(&store, ScanOptions::default());
        group.bench_with_input(BenchmarkId::from_parameter(size), &inventory, |b, inv| {
            b.iter(|| black_box(scanner.scan_at(inv, today)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_evaluate, bench_scan);
criterion_main!(benches);
