use criterion::{criterion_group, criterion_main, Criterion};
use imagify::services::placeholder::{select_theme, themed_image_with};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn benchmark_placeholders(c: &mut Criterion) {
    // Long prompt with no keyword, so every table entry is scanned
    let miss = "a quiet harbor town at dusk with fishing boats and lanterns ".repeat(8);
    let hit = "golden sunshine over a cherry blossom orchard";

    let mut group = c.benchmark_group("placeholder");

    group.bench_function("select_theme_keyword_hit", |b| {
        b.iter(|| select_theme(black_box(hit)))
    });

    group.bench_function("select_theme_long_miss", |b| {
        b.iter(|| select_theme(black_box(&miss)))
    });

    group.bench_function("themed_image", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| themed_image_with(black_box(hit), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, benchmark_placeholders);
criterion_main!(benches);
