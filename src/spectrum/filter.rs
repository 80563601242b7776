//! Spectral conditioning of tiles ahead of the FFT stage.

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

use crate::spectrum::fft::FftEngine;
use crate::tile::Tile;

/// Edge-artifact suppression applied to both tiles before the cross-power
/// stage.
///
/// The FFT assumes each tile wraps around; a real crop rarely does, and the
/// resulting border discontinuity leaks energy across the whole spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectralFilter {
    /// Use the raw tiles.
    None,
    /// Separable Hann taper, zero at the borders and one at the center.
    /// Suppresses leakage at the cost of attenuating true edge signal.
    Window,
    /// Moisan periodic-plus-smooth decomposition; keeps the periodic part,
    /// which wraps cleanly without attenuating the interior.
    #[default]
    Periodic,
}

impl SpectralFilter {
    pub(crate) fn apply(self, tile: &Tile, fft: &mut FftEngine) -> Tile {
        match self {
            SpectralFilter::None => tile.clone(),
            SpectralFilter::Window => hann_taper(tile),
            SpectralFilter::Periodic => periodic_component(tile, fft),
        }
    }
}

fn hann(n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.5 * (1.0 - (TAU * i as f64 / (n - 1) as f64).cos()))
        .collect()
}

fn hann_taper(tile: &Tile) -> Tile {
    let wx = hann(tile.width());
    let wy = hann(tile.height());
    let mut data = Vec::with_capacity(tile.width() * tile.height());
    for y in 0..tile.height() {
        for x in 0..tile.width() {
            data.push(tile.get(x, y) * wx[x] * wy[y]);
        }
    }
    Tile::from_raw(tile.width(), tile.height(), data)
}

/// Splits `u` into periodic and smooth parts and returns the periodic part.
///
/// The smooth part absorbs the cross-border jumps of `u`: its DFT is the
/// transformed boundary-difference signal divided by the discrete Laplacian
/// kernel `2(cos fx + cos fy - 2)`, with the DC term pinned to zero.
pub(crate) fn periodic_component(tile: &Tile, fft: &mut FftEngine) -> Tile {
    let w = tile.width();
    let h = tile.height();
    if w < 2 || h < 2 {
        return tile.clone();
    }

    // Column-wise and row-wise boundary differences, taken to the frequency
    // domain along their own axis.
    let mut w1: Vec<Complex64> = (0..h)
        .map(|y| Complex64::new(tile.get(w - 1, y) - tile.get(0, y), 0.0))
        .collect();
    let mut w2: Vec<Complex64> = (0..w)
        .map(|x| Complex64::new(tile.get(x, h - 1) - tile.get(x, 0), 0.0))
        .collect();
    fft.fft1(&mut w1);
    fft.fft1(&mut w2);

    let mut s_hat = vec![Complex64::new(0.0, 0.0); w * h];
    for y in 0..h {
        let ay = TAU * y as f64 / h as f64;
        let (sin_y, cos_y) = ay.sin_cos();
        let one_minus_exp_y = Complex64::new(1.0 - cos_y, -sin_y);
        for x in 0..w {
            if x == 0 && y == 0 {
                continue;
            }
            let ax = TAU * x as f64 / w as f64;
            let (sin_x, cos_x) = ax.sin_cos();
            let one_minus_exp_x = Complex64::new(1.0 - cos_x, -sin_x);
            let boundary = w1[y] * one_minus_exp_x + one_minus_exp_y * w2[x];
            let kernel = 2.0 * (cos_y + cos_x - 2.0);
            s_hat[y * w + x] = boundary / kernel;
        }
    }
    fft.ifft2(&mut s_hat, w, h);

    let data = tile
        .data()
        .iter()
        .zip(&s_hat)
        .map(|(&u, s)| u - s.re)
        .collect();
    Tile::from_raw(w, h, data)
}
