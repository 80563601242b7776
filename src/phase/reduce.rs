//! Reduction of the cross-power surface to per-axis phase profiles.

use rustfft::num_complex::Complex64;

use crate::phase::unwrap::unwrap;

/// How the 2D cross-power surface collapses to two 1D phase profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileReduction {
    /// Phase of the dominant singular pair of Q (rank-1 truncation). More
    /// robust than slicing because every row and column contributes.
    #[default]
    Svd,
    /// Central row and column of the phase surface.
    Slice,
}

/// Returns `(vertical, horizontal)` unwrapped phase profiles of `q`.
///
/// The vertical profile has `height` samples, the horizontal one `width`.
pub(crate) fn phase_profiles(
    q: &[Complex64],
    width: usize,
    height: usize,
    mode: ProfileReduction,
) -> (Vec<f64>, Vec<f64>) {
    match mode {
        ProfileReduction::Svd => {
            let (u, v) = dominant_singular_pair(q, width, height);
            let vertical: Vec<f64> = u.iter().map(|c| c.arg()).collect();
            // The right factor of the rank-1 product is the conjugated
            // singular vector, so the raw phase needs conjugating back.
            let horizontal: Vec<f64> = v.iter().map(|c| c.conj().arg()).collect();
            (unwrap(&vertical), unwrap(&horizontal))
        }
        ProfileReduction::Slice => {
            let mid_row = height / 2;
            let mid_col = width / 2;
            let horizontal: Vec<f64> = (0..width)
                .map(|x| q[mid_row * width + x].arg())
                .collect();
            let vertical: Vec<f64> = (0..height)
                .map(|y| q[y * width + mid_col].arg())
                .collect();
            (unwrap(&vertical), unwrap(&horizontal))
        }
    }
}

const POWER_ITERATIONS: usize = 32;
const CONVERGENCE_EPS: f64 = 1e-12;

/// Dominant singular pair of `q` by deterministic alternating power
/// iteration.
///
/// The iteration seeds from a fixed uniform vector, so identical inputs give
/// bit-identical vectors. A near-rank-1 surface (the shape a clean phase
/// ramp produces) converges in a couple of rounds.
fn dominant_singular_pair(
    q: &[Complex64],
    width: usize,
    height: usize,
) -> (Vec<Complex64>, Vec<Complex64>) {
    let zero = Complex64::new(0.0, 0.0);
    let mut v = vec![Complex64::new(1.0 / (width as f64).sqrt(), 0.0); width];
    let mut u = vec![zero; height];
    let mut sigma = 0.0f64;

    for round in 0..POWER_ITERATIONS {
        for (y, out) in u.iter_mut().enumerate() {
            let row = &q[y * width..(y + 1) * width];
            *out = row.iter().zip(&v).map(|(a, b)| a * b).sum();
        }
        let nu = l2_norm(&u);
        if nu == 0.0 {
            if round == 0 {
                // The uniform seed can be orthogonal to the dominant vector;
                // restart from a basis vector once.
                v.iter_mut().for_each(|c| *c = zero);
                v[0] = Complex64::new(1.0, 0.0);
                continue;
            }
            break;
        }
        u.iter_mut().for_each(|c| *c /= nu);

        for (x, out) in v.iter_mut().enumerate() {
            *out = (0..height)
                .map(|y| q[y * width + x].conj() * u[y])
                .sum();
        }
        let nv = l2_norm(&v);
        if nv == 0.0 {
            break;
        }
        v.iter_mut().for_each(|c| *c /= nv);

        if (nv - sigma).abs() <= CONVERGENCE_EPS * nv.max(1.0) {
            break;
        }
        sigma = nv;
    }
    (u, v)
}

fn l2_norm(values: &[Complex64]) -> f64 {
    values.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt()
}
