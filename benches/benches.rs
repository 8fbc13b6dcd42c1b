use criterion::*;
use ropeskip::JumpRope;

const PARAGRAPH: &str = "the quick brown fox jumps over the lazy dog. ";

fn build_rope(paragraphs: usize) -> JumpRope {
    let mut rope = JumpRope::with_seed(0xf00d);
    for _ in 0..paragraphs {
        let len = rope.runes();
        rope.insert(len, PARAGRAPH).unwrap();
    }
    rope
}

fn insert_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_append");
    for paragraphs in [10usize, 100, 1000] {
        group.throughput(Throughput::Bytes(PARAGRAPH.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &paragraphs, |b, &paragraphs| {
            b.iter_batched(
                || build_rope(paragraphs),
                |mut rope| {
                    let len = rope.runes();
                    rope.insert(len, PARAGRAPH).unwrap();
                    black_box(rope.size());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn insert_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_middle");
    for paragraphs in [10usize, 100, 1000] {
        group.throughput(Throughput::Bytes(PARAGRAPH.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &paragraphs, |b, &paragraphs| {
            b.iter_batched(
                || build_rope(paragraphs),
                |mut rope| {
                    let mid = rope.runes() / 2;
                    rope.insert(mid, PARAGRAPH).unwrap();
                    black_box(rope.size());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn erase_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_middle");
    for paragraphs in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &paragraphs, |b, &paragraphs| {
            b.iter_batched(
                || build_rope(paragraphs),
                |mut rope| {
                    let mid = rope.runes() / 2;
                    rope.erase_at(mid, PARAGRAPH.len()).unwrap();
                    black_box(rope.size());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn substr_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("substr");
    for paragraphs in [10usize, 100, 1000] {
        let rope = build_rope(paragraphs);
        let runes = rope.runes();
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &paragraphs, |b, _| {
            b.iter(|| {
                let mid = runes / 2;
                black_box(rope.substr(mid.saturating_sub(20), (mid + 20).min(runes)));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, insert_append, insert_middle, erase_middle, substr_random_access);
criterion_main!(benches);
