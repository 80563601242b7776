//! PhaseCorr estimates sub-pixel translation and rotation between raster
//! tiles from the phase of their normalized cross-power spectrum.
//!
//! The translation pipeline runs spectral pre-filtering, a 2D FFT cross-power
//! stage, rank-1 phase-surface reduction, 1D phase unwrapping and a line fit
//! whose slope converts directly into a fractional-pixel shift. Rotation is
//! estimated by feeding log-polar magnitude spectra through the same chain,
//! and [`scan_disparity`] sweeps the estimator over large image pairs to
//! build dense misregistration fields.
//!
//! Dense scans can run row-parallel via the `rayon` feature; diagnostic spans
//! and events are emitted when the `tracing` feature is enabled.

pub mod estimate;
pub mod fit;
pub mod phase;
pub mod scan;
pub mod spectrum;
pub mod tile;
mod trace;
pub mod util;
pub mod warp;

pub use rustfft::num_complex::Complex64;

pub use estimate::{
    estimate_rotation, estimate_translation, estimate_translation_inspect, DiagnosticSink,
    EstimatorConfig, NoDiagnostics, RotationEstimate, ShiftEstimate,
};
pub use fit::{LineFit, LineFitMethod};
pub use phase::ProfileReduction;
pub use scan::post::{interpolate_gaps, mask_low_scores, postprocess, resize_field};
pub use scan::{scan_disparity, DisparityField, ScanConfig};
pub use spectrum::SpectralFilter;
pub use tile::Tile;
pub use util::{PhaseCorrError, PhaseCorrResult};
pub use warp::warp_similarity;

#[cfg(feature = "rayon")]
pub use scan::rayon::scan_disparity_par;
