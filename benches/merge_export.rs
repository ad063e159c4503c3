//! Performance benchmarks for merge, export and conversion on large graphs.
//!
//! Run with: cargo bench --bench merge_export

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sit::formats::EncodeOptions;
use sit::model::{CanonicalSbom, Component, HashAlgorithm, Relationship, SbomFormat};
use sit::{ConversionGateway, ExportEngine, MergeEngine, MergeOptions};
use std::hint::black_box;

/// Generate a layered dependency graph: every component depends on up to
/// three components of the next layer, plus a back edge every 50 nodes.
fn generate_sbom(prefix: &str, count: usize) -> CanonicalSbom {
    let mut sbom = CanonicalSbom::default();
    sbom.document.name = Some(prefix.to_string());

    for i in 0..count {
        let id = format!("pkg:npm/{prefix}-component-{i}@1.{}.{}", i % 10, i % 100);
        let comp = Component::new(id, format!("{prefix}-component-{i}"))
            .with_version(format!("1.{}.{}", i % 10, i % 100))
            .with_hash(HashAlgorithm::Sha256, format!("{i:064x}"));
        sbom.add_component(comp);
    }

    let ids: Vec<_> = sbom.components.keys().cloned().collect();
    for (i, from) in ids.iter().enumerate() {
        for step in 1..=3 {
            if let Some(to) = ids.get(i * 3 + step) {
                sbom.add_relationship(Relationship::depends_on(from.clone(), to.clone()));
            }
        }
        if i > 0 && i % 50 == 0 {
            sbom.add_relationship(Relationship::depends_on(from.clone(), ids[i / 2].clone()));
        }
    }
    if let Some(first) = ids.first() {
        sbom.add_root(first.clone());
    }
    sbom
}

/// Sub graph sharing `overlap` percent of its components with `generate_sbom("app", ..)`.
fn generate_overlapping_sub(count: usize, overlap: usize) -> CanonicalSbom {
    let shared = count * overlap / 100;
    let mut sub = generate_sbom("vendor", count - shared);
    let base = generate_sbom("app", shared);
    for comp in base.components.values() {
        sub.add_component(comp.clone());
    }
    sub
}

fn bench_merge_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_scaling");
    let engine = MergeEngine::new(MergeOptions::default());

    for size in &[100usize, 1_000, 10_000] {
        let root = generate_sbom("app", *size);
        let sub = generate_overlapping_sub(*size, 20);
        group.bench_with_input(BenchmarkId::new("overlap_20", size), size, |b, _| {
            b.iter(|| {
                let _ = black_box(engine.merge(black_box(&root), black_box(&sub)));
            })
        });
    }
    group.finish();
}

fn bench_export_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_scaling");
    let engine = ExportEngine::default();

    for size in &[100usize, 1_000, 10_000] {
        let sbom = generate_sbom("app", *size);
        let root = sbom.roots[0].clone();
        group.bench_with_input(BenchmarkId::new("from_root", size), size, |b, _| {
            b.iter(|| {
                let _ = black_box(engine.export(black_box(&sbom), [root.as_str()]));
            })
        });
    }
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_1000");
    let gateway = ConversionGateway::new();
    let sbom = generate_sbom("app", 1_000);
    let options = EncodeOptions::default();

    for format in SbomFormat::ALL {
        let encoded = match gateway.convert(&sbom, format, &options) {
            Ok(encoded) => encoded,
            Err(err) => panic!("encoding {format} failed: {err}"),
        };
        group.bench_function(BenchmarkId::new("encode", format.key()), |b| {
            b.iter(|| {
                let _ = black_box(gateway.convert(black_box(&sbom), format, &options));
            })
        });
        group.bench_function(BenchmarkId::new("decode", format.key()), |b| {
            b.iter(|| {
                let _ = black_box(gateway.decode(black_box(&encoded.bytes), Some(format)));
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_merge_scaling,
    bench_export_scaling,
    bench_convert
);
criterion_main!(benches);
