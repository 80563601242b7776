//! Line fitting over unwrapped phase profiles.

pub(crate) mod least_squares;
pub(crate) mod ransac;

use crate::util::{PhaseCorrError, PhaseCorrResult};

/// A fitted line with its coefficient of determination.
///
/// `r2` lies in `(-inf, 1]`; one means a perfect fit over the samples (or
/// inliers, for RANSAC) the fit was scored on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
}

/// Fit strategy for the phase profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFitMethod {
    /// Ordinary least squares over the whole fit window.
    #[default]
    LeastSquares,
    /// Robust consensus fit; outlying samples are excluded before the final
    /// least-squares refit.
    Ransac,
}

/// Fit options forwarded from the estimator config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FitOptions {
    pub method: LineFitMethod,
    pub line_fraction: f64,
    pub ransac_threshold: f64,
    pub ransac_iterations: usize,
    pub ransac_seed: u64,
}

/// Clips `profile` to a central window of `len * line_fraction` samples and
/// fits a line through it.
///
/// Sample x-coordinates are indices within the window; only the slope feeds
/// the shift calculation and the slope is invariant to the index origin.
pub(crate) fn fit_profile(profile: &[f64], opts: &FitOptions) -> PhaseCorrResult<LineFit> {
    let (start, end) = central_window(profile.len(), opts.line_fraction);
    let window = &profile[start..end];
    if window.len() < 2 {
        return Err(PhaseCorrError::InsufficientData {
            samples: window.len(),
        });
    }
    match opts.method {
        LineFitMethod::LeastSquares => least_squares::fit(window),
        LineFitMethod::Ransac => ransac::fit(
            window,
            opts.ransac_threshold,
            opts.ransac_iterations,
            opts.ransac_seed,
        ),
    }
}

fn central_window(len: usize, fraction: f64) -> (usize, usize) {
    let half = (len as f64 * fraction / 2.0).floor() as usize;
    let centre = len / 2;
    (centre.saturating_sub(half), (centre + half).min(len))
}
