//! Rotation estimation on log-polar magnitude spectra.

use crate::estimate::logpolar::{log_polar_magnitude, ANGULAR_SAMPLES, ANGULAR_SPAN_DEG};
use crate::estimate::{check_pair, shift_from_cross_power, EstimatorConfig, NoDiagnostics};
use crate::spectrum::fft::FftEngine;
use crate::tile::Tile;
use crate::util::math::wrap_deg;
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Estimated rotation between two tiles, in degrees, with the fit quality of
/// the angular-axis profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationEstimate {
    pub angle_deg: f64,
    pub score: f64,
}

/// Estimates the relative rotation between two equally shaped tiles.
///
/// Both tiles are spectrally filtered, their FFT magnitudes remapped to
/// log-polar coordinates, and the translation pipeline run on the polar
/// images. A rotation is a cyclic shift along the angular axis of that
/// mapping, so the angular-axis shift in samples is the rotation in degrees.
/// The radial-axis shift would carry relative scale and is discarded.
///
/// The angular sweep covers a half turn (the magnitude spectrum repeats
/// after 180 degrees), so estimates are unambiguous within (-90, 90].
pub fn estimate_rotation(
    tile1: &Tile,
    tile2: &Tile,
    config: &EstimatorConfig,
) -> PhaseCorrResult<RotationEstimate> {
    check_pair(tile1, tile2, config)?;
    if tile1.width() / 2 < 2 || tile1.height() / 2 < 2 {
        return Err(PhaseCorrError::InvalidInput(
            "tiles too small for log-polar remapping",
        ));
    }

    let mut fft = FftEngine::new();
    let filtered1 = config.filter.apply(tile1, &mut fft);
    let filtered2 = config.filter.apply(tile2, &mut fft);
    let polar1 = log_polar_magnitude(&filtered1, &mut fft);
    let polar2 = log_polar_magnitude(&filtered2, &mut fft);

    let shift = shift_from_cross_power(&polar1, &polar2, config, &mut fft, &mut NoDiagnostics)?;
    let angle_deg = wrap_deg(shift.dy * ANGULAR_SPAN_DEG / ANGULAR_SAMPLES as f64);
    Ok(RotationEstimate {
        angle_deg,
        score: shift.score_y,
    })
}

#[cfg(test)]
mod tests {
    use super::estimate_rotation;
    use crate::estimate::EstimatorConfig;
    use crate::tile::Tile;
    use crate::util::PhaseCorrError;

    #[test]
    fn tiny_tiles_are_rejected() {
        let t = Tile::zeros(3, 3);
        assert!(matches!(
            estimate_rotation(&t, &t, &EstimatorConfig::default()),
            Err(PhaseCorrError::InvalidInput(_))
        ));
    }

    #[test]
    fn identical_tiles_rotate_by_zero() {
        let t = Tile::from_fn(64, 64, |x, y| {
            (x as f64 * 0.37).sin() + (y as f64 * 0.21).cos()
        });
        let est = estimate_rotation(&t, &t, &EstimatorConfig::default()).unwrap();
        assert!(est.angle_deg.abs() < 0.1);
        assert!(est.score > 0.99);
    }
}
