//! Row-parallel disparity scanning (feature-gated).

use rayon::prelude::*;

use crate::scan::{DisparityField, ScanConfig, ScanPlan};
use crate::spectrum::fft::FftEngine;
use crate::tile::Tile;
use crate::trace::{trace_event, trace_span};
use crate::util::PhaseCorrResult;

/// Parallel variant of [`scan_disparity`](crate::scan::scan_disparity).
///
/// One worker handles one output row, each with its own FFT engine so plan
/// caches are never shared. Results are assembled by (row, col) index, so
/// the field is identical to the serial scan regardless of worker timing.
pub fn scan_disparity_par(
    image1: &Tile,
    image2: &Tile,
    config: &ScanConfig,
    guide: Option<&DisparityField>,
) -> PhaseCorrResult<DisparityField> {
    let plan = ScanPlan::new(image1, image2, config, guide)?;
    let _span = trace_span!(
        "disparity_scan",
        rows = plan.rows,
        cols = plan.cols,
        parallel = true
    )
    .entered();

    let rows: Vec<Vec<_>> = (0..plan.rows)
        .into_par_iter()
        .map_init(FftEngine::new, |fft, row| {
            (0..plan.cols).map(|col| plan.cell(row, col, fft)).collect()
        })
        .collect();

    let cells: Vec<_> = rows.into_iter().flatten().collect();
    let skipped = cells.iter().filter(|c| c.dx.is_nan()).count();
    trace_event!("scan_done", cells = cells.len(), skipped = skipped);
    Ok(DisparityField::from_cells(plan.rows, plan.cols, cells))
}
