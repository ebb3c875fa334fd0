//! Scoring benchmarks on large synthesized documents.
//!
//! Run with: cargo bench --bench scoring

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sbom_scorecard::model::{
    Checksum, CreationInfo, Creator, ExternalId, LicenseAssertionState, Package, SbomDocument,
    SbomFile, SbomFormat,
};
use sbom_scorecard::scorecard::{GradeWeights, ScoreCounters, ScorecardReport};
use std::hint::black_box;

/// Generate a document with `count` packages and as many files, roughly
/// half of them complete.
fn generate_document(count: usize) -> SbomDocument {
    let mut doc = SbomDocument::new(SbomFormat::Spdx);
    doc.creation_info = Some(
        CreationInfo::new("2024-01-01T00:00:00Z").with_creator(Creator::tool("bench-1.0.0")),
    );

    for i in 0..count {
        let name = format!("component-{i}");
        let mut pkg = Package::new(name.clone());
        if i % 2 == 0 {
            pkg = pkg
                .with_version(format!("1.{}.{}", i % 10, i % 100))
                .with_declared_license(LicenseAssertionState::Present("Apache-2.0".into()))
                .with_checksum(Checksum::new("SHA256", format!("{i:064x}")));
        }
        if i % 3 == 0 {
            pkg = pkg.with_external_id(ExternalId::Purl(format!("pkg:npm/{name}@1.0.0")));
        }
        if i % 5 == 0 {
            pkg = pkg.with_external_id(ExternalId::Cpe(format!(
                "cpe:2.3:a:acme:{name}:1.0.0:*:*:*:*:*:*:*"
            )));
        }
        doc.add_package(pkg);

        let mut file = SbomFile::new(format!("./src/file-{i}.rs"));
        if i % 4 != 0 {
            file = file.with_checksum(Checksum::new("SHA1", format!("{i:040x}")));
        }
        doc.add_file(file);
    }

    doc
}

fn bench_counters(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_counters");

    for size in [1_000, 10_000, 100_000] {
        let doc = generate_document(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| ScoreCounters::collect(black_box(doc)));
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let doc = generate_document(10_000);
    let report = ScorecardReport::from_document(&doc);
    let weights = GradeWeights::default();

    c.bench_function("report_text", |b| b.iter(|| black_box(&report).report()));
    c.bench_function("grade", |b| b.iter(|| black_box(&report).grade(&weights)));
}

criterion_group!(benches, bench_counters, bench_report);
criterion_main!(benches);
