//! End-to-end formatting benchmarks.
//!
//! Covers the fast path (flags + lowercase verb), the general parser
//! (width, precision, explicit indexes) and composite operands.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fmtverb_core::{Arg, Field, Printer, args, sprintf};

fn bench_fast_path(c: &mut Criterion) {
    let list = args![42, "name", 3.5, true];
    c.bench_function("sprintf_fast_path", |b| {
        b.iter(|| black_box(sprintf(black_box("%d %s %v %t"), &list)));
    });
}

fn bench_width_precision(c: &mut Criterion) {
    let list = args![42, 3.14159, "truncate me", -7];
    c.bench_function("sprintf_width_precision", |b| {
        b.iter(|| black_box(sprintf(black_box("%08d|%10.3f|%-6.4s|%+5d"), &list)));
    });
}

fn bench_explicit_index(c: &mut Criterion) {
    let list = args![1, 2, 3];
    c.bench_function("sprintf_explicit_index", |b| {
        b.iter(|| black_box(sprintf(black_box("%[3]d %[1]d %[2]*d"), &list)));
    });
}

fn bench_struct(c: &mut Criterion) {
    let point = Arg::structure(
        "Point",
        vec![Field::new("X", 1), Field::new("Y", 2), Field::new("Label", "origin")],
    );
    let list = [point];
    c.bench_function("sprintf_struct_syntax", |b| {
        b.iter(|| black_box(sprintf(black_box("%#v"), &list)));
    });
}

fn bench_slice_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprintf_slice");
    for size in [8usize, 64, 512] {
        let items: Vec<Arg<'_>> = (0..size).map(|n| Arg::from(n as i64)).collect();
        let list = [Arg::slice("[]i64", items)];
        let mut printer = Printer::new();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &list, |b, list| {
            b.iter(|| {
                printer.clear();
                printer.printf("%v", list);
                black_box(printer.as_bytes().len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_fast_path,
    bench_width_precision,
    bench_explicit_index,
    bench_struct,
    bench_slice_sizes
);
criterion_main!(benches);
