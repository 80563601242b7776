//! 2D FFT helpers built from cached 1D rustfft plans.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Plans 1D FFTs on demand and composes them into 2D transforms by a
/// row pass, transpose, column pass, transpose back.
///
/// rustfft's planner caches plans per length, so a disparity scan that keeps
/// one engine per worker reuses its twiddle tables across every cell.
pub(crate) struct FftEngine {
    planner: FftPlanner<f64>,
}

impl FftEngine {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Forward 2D FFT of a real row-major buffer.
    pub fn fft2(&mut self, data: &[f64], width: usize, height: usize) -> Vec<Complex64> {
        let mut buf: Vec<Complex64> = data.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        self.fft2_complex(&mut buf, width, height);
        buf
    }

    /// Forward 2D FFT in place over a complex row-major buffer.
    pub fn fft2_complex(&mut self, buf: &mut Vec<Complex64>, width: usize, height: usize) {
        let row_fft = self.planner.plan_fft_forward(width);
        for row in buf.chunks_exact_mut(width) {
            row_fft.process(row);
        }
        let mut flipped = transpose(buf, width, height);
        let col_fft = self.planner.plan_fft_forward(height);
        for col in flipped.chunks_exact_mut(height) {
            col_fft.process(col);
        }
        *buf = transpose(&flipped, height, width);
    }

    /// Inverse 2D FFT in place, normalized by `1 / (width * height)`.
    pub fn ifft2(&mut self, buf: &mut Vec<Complex64>, width: usize, height: usize) {
        let row_fft = self.planner.plan_fft_inverse(width);
        for row in buf.chunks_exact_mut(width) {
            row_fft.process(row);
        }
        let mut flipped = transpose(buf, width, height);
        let col_fft = self.planner.plan_fft_inverse(height);
        for col in flipped.chunks_exact_mut(height) {
            col_fft.process(col);
        }
        *buf = transpose(&flipped, height, width);
        let norm = 1.0 / (width * height) as f64;
        for v in buf.iter_mut() {
            *v *= norm;
        }
    }

    /// Forward 1D FFT in place.
    pub fn fft1(&mut self, buf: &mut [Complex64]) {
        self.planner.plan_fft_forward(buf.len()).process(buf);
    }
}

/// Out-of-place transpose of a `height x width` row-major buffer.
pub(crate) fn transpose(data: &[Complex64], width: usize, height: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); data.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = data[y * width + x];
        }
    }
    out
}

/// Moves the zero-frequency bin to the center by rolling both axes by half.
pub(crate) fn fftshift(data: &[Complex64], width: usize, height: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); data.len()];
    for y in 0..height {
        let sy = (y + height / 2) % height;
        for x in 0..width {
            let sx = (x + width / 2) % width;
            out[sy * width + sx] = data[y * width + x];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{fftshift, FftEngine};
    use rustfft::num_complex::Complex64;

    #[test]
    fn impulse_transforms_to_flat_spectrum() {
        let mut data = vec![0.0; 12];
        data[0] = 1.0;
        let mut fft = FftEngine::new();
        let spec = fft.fft2(&data, 4, 3);
        for v in &spec {
            assert!((v.re - 1.0).abs() < 1e-12 && v.im.abs() < 1e-12);
        }
    }

    #[test]
    fn forward_inverse_round_trip() {
        let data: Vec<f64> = (0..24).map(|i| (i as f64 * 0.7).sin()).collect();
        let mut fft = FftEngine::new();
        let mut buf = fft.fft2(&data, 6, 4);
        fft.ifft2(&mut buf, 6, 4);
        for (orig, got) in data.iter().zip(&buf) {
            assert!((orig - got.re).abs() < 1e-10 && got.im.abs() < 1e-10);
        }
    }

    #[test]
    fn fftshift_centers_dc() {
        let mut data = vec![Complex64::new(0.0, 0.0); 16];
        data[0] = Complex64::new(1.0, 0.0);
        let shifted = fftshift(&data, 4, 4);
        assert!((shifted[2 * 4 + 2].re - 1.0).abs() < 1e-12);
    }
}
