//! Spatial smoothing of the cross-power surface.

use rustfft::num_complex::Complex64;

/// Box-filters the real and imaginary parts of `q` independently and
/// recombines them with the components swapped (`imag' + i*real'`). The swap
/// reflects every cell's phase about pi/4, which negates the ramp slope; the
/// shift calculator negates both shifts whenever this filter ran, restoring
/// the sign. Keep the swap and the negation together.
pub(crate) fn fringe_filter(
    q: &[Complex64],
    width: usize,
    height: usize,
    size: usize,
) -> Vec<Complex64> {
    let re: Vec<f64> = q.iter().map(|c| c.re).collect();
    let im: Vec<f64> = q.iter().map(|c| c.im).collect();
    let re_f = box_filter(&re, width, height, size);
    let im_f = box_filter(&im, width, height, size);
    re_f.iter()
        .zip(&im_f)
        .map(|(&r, &i)| Complex64::new(i, r))
        .collect()
}

/// Separable uniform box filter with replicated borders.
fn box_filter(data: &[f64], width: usize, height: usize, size: usize) -> Vec<f64> {
    let half = (size / 2) as isize;
    let inv = 1.0 / size as f64;

    let mut rows = vec![0.0; data.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for k in -half..=(size as isize - 1 - half) {
                let sx = (x as isize + k).clamp(0, width as isize - 1) as usize;
                acc += data[y * width + sx];
            }
            rows[y * width + x] = acc * inv;
        }
    }

    let mut out = vec![0.0; data.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for k in -half..=(size as isize - 1 - half) {
                let sy = (y as isize + k).clamp(0, height as isize - 1) as usize;
                acc += rows[sy * width + x];
            }
            out[y * width + x] = acc * inv;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{box_filter, fringe_filter};
    use rustfft::num_complex::Complex64;

    #[test]
    fn box_filter_preserves_constants() {
        let data = vec![2.5; 20];
        let out = box_filter(&data, 5, 4, 3);
        for v in out {
            assert!((v - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn recombination_swaps_components() {
        let q = vec![Complex64::new(1.0, 0.0); 9];
        let out = fringe_filter(&q, 3, 3, 3);
        for v in out {
            assert!(v.re.abs() < 1e-12 && (v.im - 1.0).abs() < 1e-12);
        }
    }
}
