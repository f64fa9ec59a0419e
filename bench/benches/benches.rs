use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use heightmap::{DiamondSquare, Grid, SeededSource};

const SEED: u64 = 2025;
const ROUGHNESS: f64 = 0.8;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("DiamondSquare generate");
    for exp in [6u32, 7, 8, 9] {
        let size = (1usize << exp) + 1;
        let ds = DiamondSquare::new(size, ROUGHNESS).expect("dyadic size");
        group.bench_with_input(BenchmarkId::from_parameter(size), &ds, |b, ds| {
            b.iter(|| {
                let mut rng = SeededSource::new(SEED);
                black_box(ds.generate(&mut rng))
            })
        });
    }
    group.finish();
}

fn bench_subdivide_only(c: &mut Criterion) {
    let ds = DiamondSquare::new(257, ROUGHNESS).expect("dyadic size");
    c.bench_function("DiamondSquare subdivide 257 (no normalize)", |b| {
        b.iter(|| {
            let mut rng = SeededSource::new(SEED);
            black_box(ds.subdivide(&mut rng))
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let ds = DiamondSquare::new(513, ROUGHNESS).expect("dyadic size");
    let raw: Grid = ds.subdivide(&mut SeededSource::new(SEED));
    c.bench_function("Grid normalize 513", |b| {
        b.iter(|| {
            let mut grid = raw.clone();
            grid.normalize();
            black_box(grid)
        })
    });
}

criterion_group!(
    heightmap_benchmarks,
    bench_generate,
    bench_subdivide_only,
    bench_normalize
);
criterion_main!(heightmap_benchmarks);
