use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use flaggle_core::{GridSize, MatchBitmap};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_matches(rng: &mut SmallRng, grid: GridSize) -> Vec<u8> {
    (0..grid.total_cells())
        .map(|_| u8::from(rng.random_bool(0.3)))
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let grid = GridSize::default();
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let rounds: Vec<_> = (0..5).map(|_| random_matches(&mut rng, grid)).collect();

    c.bench_function("merge_full_round", |b| {
        b.iter(|| {
            let mut bitmap = MatchBitmap::from_matches(grid, &rounds[0]).unwrap();
            for matches in &rounds[1..] {
                bitmap = bitmap.merged(black_box(matches)).unwrap();
            }
            black_box(bitmap.matched_count())
        })
    });

    let base = MatchBitmap::from_matches(grid, &rounds[0]).unwrap();
    c.bench_function("merge_single", |b| {
        b.iter(|| black_box(base.merged(black_box(&rounds[1])).unwrap()))
    });
}

fn bench_pool(c: &mut Criterion) {
    let raw = flaggle_core::BundledSource.records().unwrap();

    let mut group = c.benchmark_group("pool_build");
    for locale in [flaggle_core::Locale::Eng, flaggle_core::Locale::Fra] {
        group.bench_function(locale.tag(), |b| {
            b.iter(|| black_box(flaggle_core::CountryPool::build(&raw, locale)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merge, bench_pool);
criterion_main!(benches);
