// Moving the cursor costs a copy proportional to the distance moved so jumping back and forth
// across the whole buffer is the worst case.
use criterion::{black_box, criterion_group, Criterion};
use gapbuf::GapBuffer;

fn loaded_buffer(len: usize) -> GapBuffer {
    let mut gb = GapBuffer::try_from("a".repeat(len).as_str()).unwrap();
    gb.grow().unwrap();

    gb
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor movement");

    let mut gb = loaded_buffer(64 * 1024);
    group.bench_function("jump start to end 64k", |b| {
        b.iter(|| {
            gb.move_cursor_left(black_box(usize::MAX));
            gb.move_cursor_right(black_box(usize::MAX));
        })
    });

    let mut gb = loaded_buffer(64 * 1024);
    gb.set_cursor(32 * 1024);
    group.bench_function("step left and right 64k", |b| {
        b.iter(|| {
            for _ in 0..100 {
                gb.move_cursor_left(black_box(1));
            }
            for _ in 0..100 {
                gb.move_cursor_right(black_box(1));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
