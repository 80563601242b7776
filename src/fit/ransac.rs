//! RANSAC line fit with refit-on-inliers.
//!
//! Two-point minimal samples score a candidate line by its consensus set;
//! the best set is refit with least squares and scored by R-squared over the
//! inliers only. The sampler is seeded, so runs are reproducible.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::fit::least_squares;
use crate::fit::LineFit;
use crate::util::{PhaseCorrError, PhaseCorrResult};

pub(crate) fn fit(
    window: &[f64],
    residual_threshold: f64,
    max_iterations: usize,
    seed: u64,
) -> PhaseCorrResult<LineFit> {
    let n = window.len();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut best_inliers: Vec<usize> = Vec::new();

    for _ in 0..max_iterations {
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        let slope = (window[j] - window[i]) / (j as f64 - i as f64);
        let intercept = window[i] - slope * i as f64;

        let inliers: Vec<usize> = (0..n)
            .filter(|&k| (window[k] - (slope * k as f64 + intercept)).abs() <= residual_threshold)
            .collect();
        if inliers.len() > best_inliers.len() {
            let all_in = inliers.len() == n;
            best_inliers = inliers;
            if all_in {
                break;
            }
        }
    }

    if best_inliers.len() < 2 {
        return Err(PhaseCorrError::InsufficientData {
            samples: best_inliers.len(),
        });
    }

    let points: Vec<(f64, f64)> = best_inliers
        .iter()
        .map(|&k| (k as f64, window[k]))
        .collect();
    least_squares::fit_points(&points)
}
