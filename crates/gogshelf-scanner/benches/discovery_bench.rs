//! Discovery benchmarks: a library of standalone installers mixed with
//! unrelated files, and the key-set diff against a previous snapshot.
//!
//! Run with: cargo bench -p gogshelf-scanner --bench discovery_bench

use std::collections::BTreeSet;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gogshelf_scanner::archive::ArchiveLister;
use gogshelf_scanner::{diff_keys, Discoverer, DiscoveryOptions};
use tempfile::TempDir;

/// `count` game folders, each with one installer and a few extras.
fn create_library(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..count {
        let game = dir.path().join(format!("Game_{i:05}"));
        std::fs::create_dir_all(game.join("extras")).unwrap();
        std::fs::write(game.join(format!("setup_game_{i}.exe")), b"").unwrap();
        std::fs::write(game.join(format!("setup_game_{i}-1.bin")), b"").unwrap();
        std::fs::write(game.join("extras").join("manual.pdf"), b"").unwrap();
    }
    dir
}

fn discovery_standalone(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery");
    group.sample_size(10);

    for size in [100, 1000, 5000] {
        let dir = create_library(size);
        let discoverer = Discoverer::new(DiscoveryOptions::default(), ArchiveLister::unavailable());

        group.bench_with_input(BenchmarkId::new("standalone", size), &size, |b, _| {
            b.iter(|| {
                let set = discoverer.discover(dir.path());
                assert_eq!(set.len(), size);
            });
        });
    }
    group.finish();
}

fn diff_against_snapshot(c: &mut Criterion) {
    let current: BTreeSet<String> = (0..10_000).map(|i| format!("Game_{i:05}_setup.exe")).collect();
    let previous: BTreeSet<String> = (500..10_500).map(|i| format!("Game_{i:05}_setup.exe")).collect();

    c.bench_function("diff_keys_10k", |b| {
        b.iter(|| {
            let diff = diff_keys(&current, &previous);
            assert_eq!(diff.added.len(), 500);
            assert_eq!(diff.removed.len(), 500);
        });
    });
}

criterion_group!(benches, discovery_standalone, diff_against_snapshot);
criterion_main!(benches);
