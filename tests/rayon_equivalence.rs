//! The parallel scan must be bit-identical to the serial scan.

#![cfg(feature = "rayon")]

use phasecorr::{
    scan_disparity, scan_disparity_par, EstimatorConfig, LineFitMethod, ScanConfig,
    SpectralFilter, Tile,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn noise_image(size: usize, period: usize, seed: u64) -> Tile {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let patch: Vec<f64> = (0..period * period)
        .map(|_| rng.random_range(0.5..1.5))
        .collect();
    Tile::from_fn(size, size, |x, y| patch[(y % period) * period + x % period])
}

fn roll(tile: &Tile, dx: isize, dy: isize) -> Tile {
    let w = tile.width() as isize;
    Tile::from_fn(tile.width(), tile.height(), |x, y| {
        let sx = (x as isize - dx).rem_euclid(w) as usize;
        let sy = (y as isize - dy).rem_euclid(tile.height() as isize) as usize;
        tile.get(sx, sy)
    })
}

#[test]
fn parallel_scan_matches_serial_scan() {
    let image1 = noise_image(64, 16, 43);
    let image2 = roll(&image1, 2, -3);
    let config = ScanConfig {
        estimator: EstimatorConfig {
            filter: SpectralFilter::None,
            fit: LineFitMethod::Ransac,
            ransac_threshold: 0.05,
            ..EstimatorConfig::default()
        },
        tile_size: 16,
        output_resolution: 8,
        pad: false,
    };

    let serial = scan_disparity(&image1, &image2, &config, None).unwrap();
    let parallel = scan_disparity_par(&image1, &image2, &config, None).unwrap();

    assert_eq!(serial.rows(), parallel.rows());
    assert_eq!(serial.cols(), parallel.cols());
    for (a, b) in serial.cells().iter().zip(parallel.cells()) {
        assert_eq!(a.dx.to_bits(), b.dx.to_bits());
        assert_eq!(a.dy.to_bits(), b.dy.to_bits());
        assert_eq!(a.score_x.to_bits(), b.score_x.to_bits());
        assert_eq!(a.score_y.to_bits(), b.score_y.to_bits());
    }
}
