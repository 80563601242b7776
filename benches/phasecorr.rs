use criterion::{criterion_group, criterion_main, Criterion};
use phasecorr::{
    estimate_translation, scan_disparity, EstimatorConfig, ProfileReduction, ScanConfig,
    SpectralFilter, Tile,
};
use std::hint::black_box;

fn make_tile(size: usize, seed: u64) -> Tile {
    // Small xorshift keeps the fixture dependency-free and deterministic.
    let mut state = seed.wrapping_mul(0x9e3779b97f4a7c15) | 1;
    Tile::from_fn(size, size, |_, _| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    })
}

fn bench_translation(c: &mut Criterion) {
    let tile1 = make_tile(64, 1);
    let tile2 = make_tile(64, 2);

    let svd = EstimatorConfig::default();
    c.bench_function("estimate_translation_64_svd", |b| {
        b.iter(|| {
            let est =
                estimate_translation(black_box(&tile1), black_box(&tile2), &svd).unwrap();
            black_box(est)
        })
    });

    let slice = EstimatorConfig {
        reduction: ProfileReduction::Slice,
        ..EstimatorConfig::default()
    };
    c.bench_function("estimate_translation_64_slice", |b| {
        b.iter(|| {
            let est =
                estimate_translation(black_box(&tile1), black_box(&tile2), &slice).unwrap();
            black_box(est)
        })
    });
}

fn bench_scan(c: &mut Criterion) {
    let image1 = make_tile(128, 3);
    let image2 = make_tile(128, 4);
    let config = ScanConfig {
        estimator: EstimatorConfig {
            filter: SpectralFilter::None,
            ..EstimatorConfig::default()
        },
        tile_size: 32,
        output_resolution: 16,
        pad: false,
    };

    c.bench_function("scan_disparity_128_stride16", |b| {
        b.iter(|| {
            let field =
                scan_disparity(black_box(&image1), black_box(&image2), &config, None).unwrap();
            black_box(field)
        })
    });
}

criterion_group!(benches, bench_translation, bench_scan);
criterion_main!(benches);
