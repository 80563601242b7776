//! Ordinary least-squares line fit via the normal equations.

use crate::fit::LineFit;
use crate::util::math::mean;
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Residual below which a zero-variance profile still counts as a perfect
/// fit rather than a degenerate one.
const FLAT_RESIDUAL_EPS: f64 = 1e-9;

/// Fits `y = m*x + c` over window samples at `x = 0..n`.
pub(crate) fn fit(window: &[f64]) -> PhaseCorrResult<LineFit> {
    let points: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, &y)| (i as f64, y))
        .collect();
    fit_points(&points)
}

/// Fits `y = m*x + c` over arbitrary sample positions.
///
/// The caller guarantees at least two points with distinct x.
pub(crate) fn fit_points(points: &[(f64, f64)]) -> PhaseCorrResult<LineFit> {
    let n = points.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }
    let denom = n * sum_xx - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    let y_mean = mean(&ys);
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for &(x, y) in points {
        ss_tot += (y - y_mean) * (y - y_mean);
        let r = y - (slope * x + intercept);
        ss_res += r * r;
    }

    let r2 = if ss_tot == 0.0 {
        if ss_res <= FLAT_RESIDUAL_EPS {
            1.0
        } else {
            return Err(PhaseCorrError::DegenerateFit);
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LineFit {
        slope,
        intercept,
        r2,
    })
}
