//! The translation estimation pipeline.
//!
//! A single estimate runs: spectral filter -> 2D FFT -> normalized
//! cross-power surface -> (optional fringe smoothing) -> phase-profile
//! reduction -> 1D unwrapping -> line fit -> slope-to-shift conversion.
//! [`estimate_rotation`](rotation::estimate_rotation) reuses the same chain
//! on log-polar magnitude spectra, and the scanner drives it per tile.

mod logpolar;
mod rotation;

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

use crate::fit::{fit_profile, FitOptions, LineFit, LineFitMethod};
use crate::phase::{phase_profiles, ProfileReduction};
use crate::spectrum::cross_power::{cross_power_surface, is_degenerate};
use crate::spectrum::fft::{fftshift, FftEngine};
use crate::spectrum::fringe::fringe_filter;
use crate::spectrum::SpectralFilter;
use crate::tile::Tile;
use crate::trace::{trace_event, trace_span};
use crate::util::{PhaseCorrError, PhaseCorrResult};

pub use rotation::{estimate_rotation, RotationEstimate};

/// Options for a single-pair estimate.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Pre-FFT conditioning of both tiles.
    pub filter: SpectralFilter,
    /// How the cross-power surface collapses to per-axis profiles.
    pub reduction: ProfileReduction,
    /// Line-fit strategy for the unwrapped profiles.
    pub fit: LineFitMethod,
    /// Box-smooth the cross-power surface before reduction.
    pub fringe_filter: bool,
    /// Box kernel side length for the fringe filter.
    pub fringe_filter_size: usize,
    /// Residual threshold for RANSAC inlier classification, in radians.
    pub ransac_threshold: f64,
    /// Maximum RANSAC sampling rounds.
    pub ransac_iterations: usize,
    /// Seed for the RANSAC sampler; estimates are reproducible for a fixed
    /// seed.
    pub ransac_seed: u64,
    /// Fraction of each profile, centered, that the line fit sees.
    pub line_fraction: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            filter: SpectralFilter::Periodic,
            reduction: ProfileReduction::Svd,
            fit: LineFitMethod::LeastSquares,
            fringe_filter: false,
            fringe_filter_size: 3,
            ransac_threshold: 0.02,
            ransac_iterations: 100,
            ransac_seed: 0,
            line_fraction: 1.0,
        }
    }
}

/// Sub-pixel translation between two tiles, with per-axis fit quality.
///
/// `dx`/`dy` are fractional-pixel offsets of the second tile relative to the
/// first; `score_x`/`score_y` are the R-squared values of the corresponding
/// line fits, at most one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftEstimate {
    pub dx: f64,
    pub dy: f64,
    pub score_x: f64,
    pub score_y: f64,
}

impl ShiftEstimate {
    pub(crate) const ZERO: Self = Self {
        dx: 0.0,
        dy: 0.0,
        score_x: 0.0,
        score_y: 0.0,
    };
}

/// Receiver for intermediate pipeline values.
///
/// Every hook has an empty default body; implement only what you want to
/// observe. The surface and profiles are borrowed for the duration of the
/// call and must be copied out to be retained.
pub trait DiagnosticSink {
    /// Cross-power surface after the optional fringe filter.
    fn cross_power(&mut self, _q: &[Complex64], _width: usize, _height: usize) {}
    /// Unwrapped vertical and horizontal phase profiles.
    fn profiles(&mut self, _vertical: &[f64], _horizontal: &[f64]) {}
    /// Per-axis line fits (vertical first).
    fn fits(&mut self, _vertical: &LineFit, _horizontal: &LineFit) {}
}

/// Sink that discards everything.
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {}

/// Estimates the sub-pixel translation between two equally shaped tiles.
pub fn estimate_translation(
    tile1: &Tile,
    tile2: &Tile,
    config: &EstimatorConfig,
) -> PhaseCorrResult<ShiftEstimate> {
    let mut fft = FftEngine::new();
    check_pair(tile1, tile2, config)?;
    translation_pipeline(tile1, tile2, config, &mut fft, &mut NoDiagnostics)
}

/// Same as [`estimate_translation`], streaming intermediate values into
/// `sink`.
pub fn estimate_translation_inspect(
    tile1: &Tile,
    tile2: &Tile,
    config: &EstimatorConfig,
    sink: &mut dyn DiagnosticSink,
) -> PhaseCorrResult<ShiftEstimate> {
    let mut fft = FftEngine::new();
    check_pair(tile1, tile2, config)?;
    translation_pipeline(tile1, tile2, config, &mut fft, sink)
}

pub(crate) fn check_pair(
    tile1: &Tile,
    tile2: &Tile,
    config: &EstimatorConfig,
) -> PhaseCorrResult<()> {
    if tile1.width() != tile2.width() || tile1.height() != tile2.height() {
        return Err(PhaseCorrError::ShapeMismatch {
            width1: tile1.width(),
            height1: tile1.height(),
            width2: tile2.width(),
            height2: tile2.height(),
        });
    }
    if config.fringe_filter && config.fringe_filter_size == 0 {
        return Err(PhaseCorrError::InvalidInput(
            "fringe_filter_size must be at least 1",
        ));
    }
    tile1.validate_finite()?;
    tile2.validate_finite()
}

/// Filter + shift chain for pre-validated, equally shaped tiles.
pub(crate) fn translation_pipeline(
    tile1: &Tile,
    tile2: &Tile,
    config: &EstimatorConfig,
    fft: &mut FftEngine,
    sink: &mut dyn DiagnosticSink,
) -> PhaseCorrResult<ShiftEstimate> {
    let filtered1 = config.filter.apply(tile1, fft);
    let filtered2 = config.filter.apply(tile2, fft);
    shift_from_cross_power(&filtered1, &filtered2, config, fft, sink)
}

/// Core of the pipeline, shared verbatim by the rotation estimator (which
/// feeds it log-polar tiles).
pub(crate) fn shift_from_cross_power(
    tile1: &Tile,
    tile2: &Tile,
    config: &EstimatorConfig,
    fft: &mut FftEngine,
    sink: &mut dyn DiagnosticSink,
) -> PhaseCorrResult<ShiftEstimate> {
    let width = tile1.width();
    let height = tile1.height();
    let _span = trace_span!("shift_estimate", width = width, height = height).entered();

    let f1 = fftshift(&fft.fft2(tile1.data(), width, height), width, height);
    let f2 = fftshift(&fft.fft2(tile2.data(), width, height), width, height);

    let mut q = cross_power_surface(&f1, &f2);
    if is_degenerate(&q) {
        // The spectrum collapsed (all-zero tiles); report a zero shift with
        // zero confidence rather than failing.
        return Ok(ShiftEstimate::ZERO);
    }
    if config.fringe_filter {
        q = fringe_filter(&q, width, height, config.fringe_filter_size);
    }
    sink.cross_power(&q, width, height);

    let (vertical, horizontal) = phase_profiles(&q, width, height, config.reduction);
    sink.profiles(&vertical, &horizontal);

    let opts = FitOptions {
        method: config.fit,
        line_fraction: config.line_fraction,
        ransac_threshold: config.ransac_threshold,
        ransac_iterations: config.ransac_iterations,
        ransac_seed: config.ransac_seed,
    };
    let fit_v = fit_profile(&vertical, &opts)?;
    let fit_h = fit_profile(&horizontal, &opts)?;
    sink.fits(&fit_v, &fit_h);

    let mut dx = shift_from_slope(fit_h.slope, horizontal.len());
    let mut dy = shift_from_slope(fit_v.slope, vertical.len());
    if config.fringe_filter {
        // The fringe filter's component swap reflects the ramp; undo it.
        dx = -dx;
        dy = -dy;
    }

    trace_event!("shift", dx = dx, dy = dy, score_x = fit_h.r2, score_y = fit_v.r2);
    Ok(ShiftEstimate {
        dx,
        dy,
        score_x: fit_h.r2,
        score_y: fit_v.r2,
    })
}

/// A phase ramp of `slope` radians per frequency bin over `len` bins is a
/// spatial shift of `slope * len / 2pi` pixels.
fn shift_from_slope(slope: f64, len: usize) -> f64 {
    slope * len as f64 / TAU
}

#[cfg(test)]
mod tests {
    use super::{estimate_translation, EstimatorConfig, ShiftEstimate};
    use crate::tile::Tile;
    use crate::util::PhaseCorrError;

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = Tile::zeros(16, 16);
        let b = Tile::zeros(16, 8);
        assert!(matches!(
            estimate_translation(&a, &b, &EstimatorConfig::default()),
            Err(PhaseCorrError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let a = Tile::from_fn(8, 8, |x, y| (x + y) as f64);
        let mut data = a.data().to_vec();
        data[10] = f64::INFINITY;
        let b = Tile::from_vec(8, 8, data).unwrap();
        assert!(matches!(
            estimate_translation(&a, &b, &EstimatorConfig::default()),
            Err(PhaseCorrError::NonFiniteInput { index: 10 })
        ));
    }

    #[test]
    fn all_zero_tiles_yield_zero_estimate() {
        let z = Tile::zeros(16, 16);
        let est = estimate_translation(&z, &z, &EstimatorConfig::default()).unwrap();
        assert_eq!(est, ShiftEstimate::ZERO);
    }
}
