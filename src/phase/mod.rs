//! Phase-surface reduction and 1D unwrapping.

mod reduce;
pub(crate) mod unwrap;

pub use reduce::ProfileReduction;
pub(crate) use reduce::phase_profiles;
