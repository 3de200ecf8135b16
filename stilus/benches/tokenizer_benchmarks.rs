use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use stilus::Passage;

const SENTENCE: &str =
    "Unlike in many other parts of the world, books about how to lose weight \
     have a slim chance of becoming bestsellers in Fiji.\n";
const MIXED: &str = "문맥상 “적절한” word를 고르시오 — ① ② ③ ④ ⑤.\n";

fn benchmark_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for repeats in [1usize, 10, 100] {
        let english = SENTENCE.repeat(repeats);
        let mixed = MIXED.repeat(repeats);

        group.bench_with_input(
            BenchmarkId::new("english", format!("{}chars", english.len())),
            &english,
            |b, text| b.iter(|| Passage::new(black_box(text))),
        );

        group.bench_with_input(
            BenchmarkId::new("mixed_hangul", format!("{}chars", mixed.len())),
            &mixed,
            |b, text| b.iter(|| Passage::new(black_box(text))),
        );
    }

    group.finish();
}

fn benchmark_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");

    for repeats in [10usize, 100] {
        let passage = Passage::new(&SENTENCE.repeat(repeats));

        group.bench_with_input(
            BenchmarkId::new("round_trip", format!("{}tokens", passage.len())),
            &passage,
            |b, passage| b.iter(|| passage.reconstruct()),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_tokenize, benchmark_reconstruct);
criterion_main!(benches);
