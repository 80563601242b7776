//! Log-polar remapping of magnitude spectra.

use std::f64::consts::PI;

use crate::spectrum::fft::{fftshift, FftEngine};
use crate::tile::Tile;
use crate::warp::bilinear_sample;

/// Angular rows of the log-polar image: one per degree over a half turn.
///
/// A real tile's magnitude spectrum is point-symmetric, so a full-turn sweep
/// would repeat itself and leave every odd angular-frequency bin of the
/// polar image holding pure rounding noise, which the unit-normalized
/// cross-power stage then inflates to full weight. Half a turn covers one
/// exact period instead.
pub(crate) const ANGULAR_SAMPLES: usize = 180;

/// Span of the angular axis in degrees.
pub(crate) const ANGULAR_SPAN_DEG: f64 = 180.0;

/// Log-compressed magnitude spectrum of `tile`, remapped to (angle,
/// log-radius) axes.
///
/// Rows sweep a half turn at one degree per row; columns sweep radii
/// log-spaced from one up to `min(width, height) / 2` around the centered
/// zero-frequency bin. Translation between two tiles leaves this image
/// unchanged, while a relative rotation becomes a cyclic shift along the
/// row axis.
pub(crate) fn log_polar_magnitude(tile: &Tile, fft: &mut FftEngine) -> Tile {
    let width = tile.width();
    let height = tile.height();
    let spectrum = fftshift(&fft.fft2(tile.data(), width, height), width, height);
    let magnitude: Vec<f64> = spectrum.iter().map(|c| (1.0 + c.norm()).ln()).collect();

    let radius = (width / 2).min(height / 2);
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    // r(i) = exp(i * log_step) walks [1, radius).
    let log_step = (radius as f64).ln() / radius as f64;

    let mut data = Vec::with_capacity(ANGULAR_SAMPLES * radius);
    for row in 0..ANGULAR_SAMPLES {
        let theta = PI * row as f64 / ANGULAR_SAMPLES as f64;
        let (sin_t, cos_t) = theta.sin_cos();
        for col in 0..radius {
            let rho = (col as f64 * log_step).exp();
            let x = cx + rho * cos_t;
            let y = cy + rho * sin_t;
            data.push(bilinear_sample(&magnitude, width, height, x, y));
        }
    }
    Tile::from_raw(radius, ANGULAR_SAMPLES, data)
}

#[cfg(test)]
mod tests {
    use super::{log_polar_magnitude, ANGULAR_SAMPLES};
    use crate::spectrum::fft::FftEngine;
    use crate::tile::Tile;

    #[test]
    fn output_shape_is_angle_by_radius() {
        let tile = Tile::from_fn(32, 48, |x, y| ((x * 3 + y) % 7) as f64);
        let mut fft = FftEngine::new();
        let polar = log_polar_magnitude(&tile, &mut fft);
        assert_eq!(polar.height(), ANGULAR_SAMPLES);
        assert_eq!(polar.width(), 16);
    }


    #[test]
    fn translation_leaves_the_magnitude_map_nearly_unchanged() {
        let pattern = |x: usize, y: usize| {
            (x as f64 * 0.6).sin() + (y as f64 * 0.4).cos() + (x as f64 * 0.2 + y as f64 * 0.3).sin()
        };
        let a = Tile::from_fn(64, 64, pattern);
        let b = Tile::from_fn(64, 64, |x, y| pattern((x + 5) % 64, (y + 3) % 64));
        let mut fft = FftEngine::new();
        let pa = log_polar_magnitude(&a, &mut fft);
        let pb = log_polar_magnitude(&b, &mut fft);
        let diff: f64 = pa
            .data()
            .iter()
            .zip(pb.data())
            .map(|(u, v)| (u - v).abs())
            .sum::<f64>()
            / pa.data().len() as f64;
        let scale: f64 =
            pa.data().iter().map(|v| v.abs()).sum::<f64>() / pa.data().len() as f64;
        assert!(diff < 1e-6 * scale.max(1.0));
    }
}
