//! Normalized cross-power surfaces.

use rustfft::num_complex::Complex64;

/// `Q = F1 * conj(F2) / |F1 * conj(F2)|`, with zero-magnitude cells forced
/// to exactly zero so later stages never see a NaN.
///
/// Every cell of the result has magnitude one or zero.
pub(crate) fn cross_power_surface(f1: &[Complex64], f2: &[Complex64]) -> Vec<Complex64> {
    f1.iter()
        .zip(f2)
        .map(|(&a, &b)| {
            let g = a * b.conj();
            let mag = g.norm();
            if mag > 0.0 {
                g / mag
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
        .collect()
}

/// True when the whole surface collapsed to zero (identical flat tiles).
pub(crate) fn is_degenerate(q: &[Complex64]) -> bool {
    q.iter().all(|c| c.re == 0.0 && c.im == 0.0)
}
