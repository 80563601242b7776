//! Error types for phasecorr.

use thiserror::Error;

/// Result alias for phasecorr operations.
pub type PhaseCorrResult<T> = std::result::Result<T, PhaseCorrError>;

/// Errors raised by the estimation pipeline.
///
/// Pairwise estimators propagate every variant to the caller. The disparity
/// scanner never does: a failing cell becomes a NaN sentinel and the scan
/// keeps going.
#[derive(Debug, Error)]
pub enum PhaseCorrError {
    /// Two tiles with different shapes were passed to a pairwise estimator.
    #[error("tile shapes differ: {width1}x{height1} vs {width2}x{height2}")]
    ShapeMismatch {
        width1: usize,
        height1: usize,
        width2: usize,
        height2: usize,
    },
    /// A dimension is zero or does not match the backing buffer.
    #[error("invalid dimensions: {width}x{height} for buffer of {len} elements")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },
    /// A tile contains a NaN or infinite sample.
    #[error("non-finite sample at index {index}")]
    NonFiniteInput { index: usize },
    /// The fit window holds fewer than two samples.
    #[error("fit window holds {samples} samples, need at least 2")]
    InsufficientData { samples: usize },
    /// A zero-variance profile produced a nonzero fit residual.
    #[error("degenerate fit: zero-variance profile with nonzero residual")]
    DegenerateFit,
    /// A configuration value is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
