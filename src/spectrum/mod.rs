//! Frequency-domain plumbing: 2D FFTs, spectral pre-filters, the normalized
//! cross-power surface and its optional fringe smoothing.

pub(crate) mod cross_power;
pub(crate) mod fft;
mod filter;
pub(crate) mod fringe;

pub use filter::SpectralFilter;
