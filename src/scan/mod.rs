//! Dense disparity scanning over image pairs.
//!
//! The scanner walks a regular grid over two equally shaped images, runs the
//! translation pipeline on a window pair per grid cell and collects the
//! estimates into a [`DisparityField`]. Cells whose windows are unusable, or
//! whose estimate fails, become NaN sentinels; the scan itself always
//! completes. A previously computed coarser field can guide the window
//! extraction for a coarse-to-fine pass.

pub mod post;
#[cfg(feature = "rayon")]
pub mod rayon;

use std::borrow::Cow;

use crate::estimate::{translation_pipeline, EstimatorConfig, NoDiagnostics, ShiftEstimate};
use crate::spectrum::fft::FftEngine;
use crate::tile::Tile;
use crate::trace::{trace_event, trace_span};
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Options for a disparity scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Per-cell estimator options.
    pub estimator: EstimatorConfig,
    /// Side length of the square windows fed to the estimator.
    pub tile_size: usize,
    /// Grid stride in pixels; one output cell per `output_resolution`
    /// pixels along each axis.
    pub output_resolution: usize,
    /// Zero-pad both images by half a tile so windows centered near the
    /// border still exist. Without padding those cells stay NaN.
    pub pad: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            tile_size: 64,
            output_resolution: 1,
            pad: false,
        }
    }
}

/// Dense grid of per-cell shift estimates.
///
/// Cell `(row, col)` describes the window centered at image position
/// `(row * output_resolution, col * output_resolution)`. Cells that produced
/// no estimate hold NaN in all four channels.
#[derive(Debug, Clone)]
pub struct DisparityField {
    rows: usize,
    cols: usize,
    cells: Vec<ShiftEstimate>,
}

/// NaN sentinel for cells without an estimate.
pub(crate) const NAN_CELL: ShiftEstimate = ShiftEstimate {
    dx: f64::NAN,
    dy: f64::NAN,
    score_x: f64::NAN,
    score_y: f64::NAN,
};

impl DisparityField {
    pub(crate) fn filled(rows: usize, cols: usize, value: ShiftEstimate) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<ShiftEstimate>) -> Self {
        debug_assert_eq!(rows * cols, cells.len());
        Self { rows, cols, cells }
    }

    /// Grid height in cells.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid width in cells.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)` if it is within the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<ShiftEstimate> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// True when the cell holds an estimate rather than the NaN sentinel.
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.get(row, col)
            .map(|c| c.dx.is_finite() && c.dy.is_finite())
            .unwrap_or(false)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[ShiftEstimate] {
        &self.cells
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: ShiftEstimate) {
        self.cells[row * self.cols + col] = value;
    }

    /// Extracts one channel (0 = dx, 1 = dy, 2 = score_x, 3 = score_y) as a
    /// row-major grid.
    pub fn channel(&self, index: usize) -> Vec<f64> {
        self.cells
            .iter()
            .map(|c| match index {
                0 => c.dx,
                1 => c.dy,
                2 => c.score_x,
                _ => c.score_y,
            })
            .collect()
    }
}

/// Scans `image2` against `image1` and returns the dense disparity field.
///
/// When `guide` is given (a field from a prior, typically coarser scan), the
/// second window of each pair is pre-offset by the guide's rounded estimate
/// at that location and the offset is added back onto the cell's result, so
/// the fine pass only has to measure the residual.
pub fn scan_disparity(
    image1: &Tile,
    image2: &Tile,
    config: &ScanConfig,
    guide: Option<&DisparityField>,
) -> PhaseCorrResult<DisparityField> {
    let plan = ScanPlan::new(image1, image2, config, guide)?;
    let _span = trace_span!("disparity_scan", rows = plan.rows, cols = plan.cols).entered();

    let mut field = DisparityField::filled(plan.rows, plan.cols, NAN_CELL);
    let mut fft = FftEngine::new();
    for row in 0..plan.rows {
        for col in 0..plan.cols {
            field.set(row, col, plan.cell(row, col, &mut fft));
        }
    }

    let skipped = field.cells().iter().filter(|c| c.dx.is_nan()).count();
    trace_event!("scan_done", cells = plan.rows * plan.cols, skipped = skipped);
    Ok(field)
}

/// Validated scan geometry shared by the serial and parallel drivers.
pub(crate) struct ScanPlan<'a> {
    work1: Cow<'a, Tile>,
    work2: Cow<'a, Tile>,
    config: &'a ScanConfig,
    guide: Option<&'a DisparityField>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    /// Window margin: windows are centered, so they start half a tile before
    /// the cell position.
    half: usize,
    /// Extra coordinate offset introduced by zero padding.
    pad_offset: usize,
}

impl<'a> ScanPlan<'a> {
    pub(crate) fn new(
        image1: &'a Tile,
        image2: &'a Tile,
        config: &'a ScanConfig,
        guide: Option<&'a DisparityField>,
    ) -> PhaseCorrResult<Self> {
        if image1.width() != image2.width() || image1.height() != image2.height() {
            return Err(PhaseCorrError::ShapeMismatch {
                width1: image1.width(),
                height1: image1.height(),
                width2: image2.width(),
                height2: image2.height(),
            });
        }
        if config.tile_size < 2 {
            return Err(PhaseCorrError::InvalidInput("tile_size must be at least 2"));
        }
        if config.output_resolution == 0 {
            return Err(PhaseCorrError::InvalidInput(
                "output_resolution must be at least 1",
            ));
        }
        image1.validate_finite()?;
        image2.validate_finite()?;

        let rows = image1.height() / config.output_resolution;
        let cols = image1.width() / config.output_resolution;
        if rows == 0 || cols == 0 {
            return Err(PhaseCorrError::InvalidDimensions {
                width: cols,
                height: rows,
                len: 0,
            });
        }

        let half = config.tile_size / 2;
        let (work1, work2, pad_offset) = if config.pad {
            (
                Cow::Owned(image1.zero_padded(half)),
                Cow::Owned(image2.zero_padded(half)),
                half,
            )
        } else {
            (Cow::Borrowed(image1), Cow::Borrowed(image2), 0)
        };

        Ok(Self {
            work1,
            work2,
            config,
            guide,
            rows,
            cols,
            half,
            pad_offset,
        })
    }

    /// Guide offset for a cell, rounded to whole pixels; zero without a
    /// guide or where the guide holds a NaN sentinel.
    fn guide_offset(&self, row: usize, col: usize) -> (isize, isize) {
        let Some(guide) = self.guide else {
            return (0, 0);
        };
        // Proportional lookup so a coarser guide grid still lines up.
        let grow = row * guide.rows() / self.rows;
        let gcol = col * guide.cols() / self.cols;
        match guide.get(grow, gcol) {
            Some(cell) if cell.dx.is_finite() && cell.dy.is_finite() => {
                (cell.dx.round() as isize, cell.dy.round() as isize)
            }
            _ => (0, 0),
        }
    }

    /// Computes one output cell. Every failure mode maps to the NaN
    /// sentinel; this never propagates an error.
    pub(crate) fn cell(&self, row: usize, col: usize, fft: &mut FftEngine) -> ShiftEstimate {
        let tile = self.config.tile_size;
        let y = (row * self.config.output_resolution + self.pad_offset) as isize;
        let x = (col * self.config.output_resolution + self.pad_offset) as isize;
        let (gx, gy) = self.guide_offset(row, col);

        let x0 = x - self.half as isize;
        let y0 = y - self.half as isize;
        let Some(window1) = self.work1.window(x0, y0, tile, tile) else {
            return NAN_CELL;
        };
        let Some(window2) = self.work2.window(x0 + gx, y0 + gy, tile, tile) else {
            return NAN_CELL;
        };
        if window1.is_all_zero() || window2.is_all_zero() {
            return NAN_CELL;
        }

        match translation_pipeline(
            &window1,
            &window2,
            &self.config.estimator,
            fft,
            &mut NoDiagnostics,
        ) {
            Ok(estimate) => ShiftEstimate {
                dx: estimate.dx + gx as f64,
                dy: estimate.dy + gy as f64,
                score_x: estimate.score_x,
                score_y: estimate.score_y,
            },
            Err(_) => NAN_CELL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DisparityField, ShiftEstimate, NAN_CELL};

    #[test]
    fn field_accessors() {
        let mut field = DisparityField::filled(2, 3, NAN_CELL);
        assert_eq!(field.rows(), 2);
        assert_eq!(field.cols(), 3);
        assert!(!field.is_valid(0, 0));
        field.set(
            1,
            2,
            ShiftEstimate {
                dx: 1.0,
                dy: -2.0,
                score_x: 0.9,
                score_y: 0.8,
            },
        );
        assert!(field.is_valid(1, 2));
        assert_eq!(field.channel(1)[5], -2.0);
        assert!(field.get(2, 0).is_none());
    }
}
