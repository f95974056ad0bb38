//! Ingest benchmarks: single-writer throughput, multi-writer contention,
//! and chunk-boundary crossing.

use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

use strata_bench::utils::{fresh_table, generate_rows};

/// Single-thread append throughput.
fn bench_insert_single_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest/single_writer");

    for size in [10_000, 50_000].iter() {
        let rows = generate_rows(*size, 1000);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let dir = TempDir::new().unwrap();
                let table = fresh_table(&dir, true);
                for row in &rows {
                    table.insert(row).unwrap();
                }
                black_box(table.row_count())
            });
        });
    }

    group.finish();
}

/// Four concurrent writers sharing one tail cursor.
fn bench_insert_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest/concurrent");
    group.sample_size(10);

    for writers in [2usize, 4].iter() {
        let per_writer = 10_000;
        let rows = Arc::new(generate_rows(per_writer * writers, 1000));

        group.throughput(Throughput::Elements((per_writer * writers) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(writers), writers, |b, &writers| {
            b.iter(|| {
                let dir = TempDir::new().unwrap();
                let table = Arc::new(fresh_table(&dir, true));

                let handles: Vec<_> = (0..writers)
                    .map(|w| {
                        let table = Arc::clone(&table);
                        let rows = Arc::clone(&rows);
                        thread::spawn(move || {
                            for row in &rows[w * per_writer..(w + 1) * per_writer] {
                                table.insert(row).unwrap();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(table.row_count())
            });
        });
    }

    group.finish();
}

/// Appends that cross a lazy chunk-allocation boundary.
fn bench_chunk_crossing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest/chunk_crossing");
    group.sample_size(10);

    // Slightly more rows than one chunk holds, so every iteration pays
    // exactly one allocation event per column.
    let size = strata_common::constants::CHUNK_SIZE + 1;
    let rows = generate_rows(size, 1000);

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function("one_boundary", |b| {
        b.iter(|| {
            let dir = TempDir::new().unwrap();
            let table = fresh_table(&dir, false);
            for row in &rows {
                table.insert(row).unwrap();
            }
            black_box(table.stats().mvcc_chunks)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_single_writer,
    bench_insert_concurrent,
    bench_chunk_crossing
);
criterion_main!(benches);
