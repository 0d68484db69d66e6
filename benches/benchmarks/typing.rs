// Simulates someone typing: long runs of single unit inserts at the cursor with the occasional
// backspace. Starting from a tiny buffer means the cost of growth is included.
use criterion::{black_box, criterion_group, BenchmarkId, Criterion};
use gapbuf::GapBuffer;

const TEXT: &str = "the quick brown fox jumps over the lazy dog\n";

fn type_text(initial_capacity: usize, repeats: usize) -> GapBuffer {
    let mut gb = GapBuffer::with_capacity(initial_capacity).unwrap();
    for _ in 0..repeats {
        for &b in TEXT.as_bytes() {
            gb.insert_char(b).unwrap();
        }
        gb.delete_before_cursor(4);
        gb.insert_str("cat\n").unwrap();
    }

    gb
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");

    for repeats in [10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("insert_char", repeats),
            &repeats,
            |b, &repeats| b.iter(|| type_text(black_box(0), repeats)),
        );
    }

    let chunk = TEXT.repeat(100);
    group.bench_function("insert_text 4.4k", |b| {
        b.iter(|| {
            let mut gb = GapBuffer::new().unwrap();
            gb.insert_str(black_box(&chunk)).unwrap();
            gb
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
