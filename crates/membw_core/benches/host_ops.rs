//! Benchmarks for the host-side paths that run on every invocation.
//!
//! Run with: cargo bench -p membw_core --bench host_ops

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use membw_core::debug::{DebugRecord, DebugTotals};
use membw_core::program::kernel_source;

fn bench_debug_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("debug_accumulate");

    for slots in [1usize, 1024, 16384, 262144].iter() {
        let records = vec![
            DebugRecord {
                dropped_coll: 1,
                dropped_stor: 2,
            };
            *slots
        ];

        group.throughput(Throughput::Bytes(
            (*slots * std::mem::size_of::<DebugRecord>()) as u64,
        ));

        group.bench_with_input(
            BenchmarkId::new("accumulate", slots),
            &records,
            |bench, records| {
                bench.iter(|| {
                    let totals = DebugTotals::accumulate(black_box(records));
                    black_box(totals.dropped_storage)
                })
            },
        );
    }

    group.finish();
}

fn bench_source_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("program_source");

    group.bench_function("assemble", |bench| {
        bench.iter(|| {
            let source = kernel_source();
            black_box(source.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_debug_accumulate, bench_source_assembly);
criterion_main!(benches);
