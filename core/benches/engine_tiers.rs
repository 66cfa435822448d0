use bombbroom_core::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const TIERS: [(&str, Dimension, Dimension, CellCount); 3] = [
    ("small", 9, 9, 10),
    ("medium", 16, 16, 40),
    ("large", 30, 16, 99),
];

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, width, height, mines) in TIERS {
        let config = GameConfig::new(width, height, mines).unwrap();
        let start = Location::new(width / 2, height / 2);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(ShuffleGenerator::new(seed, Some(start), DEFAULT_SAFE_RADIUS).generate(config))
            });
        });
    }
    group.finish();
}

fn bench_flood_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_reveal");
    for size in [64, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let config = GameConfig::new(size, size, 0).unwrap();
            b.iter(|| {
                let mut game = GameEngine::with_seed(config, 0);
                black_box(game.reveal(Location::new(0, 0)))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generation, bench_flood_reveal);
criterion_main!(benches);
