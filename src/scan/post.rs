//! Disparity-field cleanup: score masking, gap interpolation, resampling.

use crate::estimate::ShiftEstimate;
use crate::scan::DisparityField;

/// Masks low-confidence cells, fills the gaps from the surviving samples and
/// optionally resamples the result to `target_shape` (rows, cols).
pub fn postprocess(
    field: &DisparityField,
    error_limit: f64,
    target_shape: Option<(usize, usize)>,
) -> DisparityField {
    let masked = mask_low_scores(field, error_limit);
    let filled = interpolate_gaps(&masked);
    match target_shape {
        Some((rows, cols)) => resize_field(&filled, rows, cols),
        None => filled,
    }
}

/// NaNs out each offset channel whose fit score falls below `error_limit`.
///
/// The x offset is gated by the x-axis score and the y offset by the y-axis
/// score; scores themselves are left untouched.
pub fn mask_low_scores(field: &DisparityField, error_limit: f64) -> DisparityField {
    let cells = field
        .cells()
        .iter()
        .map(|c| ShiftEstimate {
            dx: if c.score_x >= error_limit { c.dx } else { f64::NAN },
            dy: if c.score_y >= error_limit { c.dy } else { f64::NAN },
            score_x: c.score_x,
            score_y: c.score_y,
        })
        .collect();
    DisparityField::from_cells(field.rows(), field.cols(), cells)
}

/// Fills NaN offsets by linear interpolation between the nearest valid
/// samples, first along rows, then along columns for anything still missing.
///
/// Cells outside the sampled hull (leading or trailing runs with no valid
/// neighbor on one side in either pass) stay NaN; that boundary loss is
/// inherent to interpolating scattered samples.
pub fn interpolate_gaps(field: &DisparityField) -> DisparityField {
    let rows = field.rows();
    let cols = field.cols();
    let mut dx = field.channel(0);
    let mut dy = field.channel(1);
    for grid in [&mut dx, &mut dy] {
        fill_lines(grid, cols, rows, true);
        fill_lines(grid, cols, rows, false);
    }

    let cells = field
        .cells()
        .iter()
        .enumerate()
        .map(|(i, c)| ShiftEstimate {
            dx: dx[i],
            dy: dy[i],
            score_x: c.score_x,
            score_y: c.score_y,
        })
        .collect();
    DisparityField::from_cells(rows, cols, cells)
}

/// Linearly interpolates NaN runs between valid samples along every row
/// (`along_rows`) or column of a row-major grid.
fn fill_lines(grid: &mut [f64], cols: usize, rows: usize, along_rows: bool) {
    let (lines, line_len) = if along_rows { (rows, cols) } else { (cols, rows) };
    let index = |line: usize, i: usize| {
        if along_rows {
            line * cols + i
        } else {
            i * cols + line
        }
    };

    for line in 0..lines {
        let mut prev_valid: Option<usize> = None;
        for i in 0..line_len {
            if !grid[index(line, i)].is_nan() {
                if let Some(p) = prev_valid {
                    if i > p + 1 {
                        let a = grid[index(line, p)];
                        let b = grid[index(line, i)];
                        let span = (i - p) as f64;
                        for k in p + 1..i {
                            let t = (k - p) as f64 / span;
                            grid[index(line, k)] = a + (b - a) * t;
                        }
                    }
                }
                prev_valid = Some(i);
            }
        }
    }
}

/// NaN-aware area resampling of all four channels to `(rows, cols)`.
///
/// Each target cell averages the source cells its footprint overlaps,
/// weighted by overlap area and skipping NaN contributions; a footprint with
/// no valid source stays NaN.
pub fn resize_field(field: &DisparityField, rows: usize, cols: usize) -> DisparityField {
    if rows == 0 || cols == 0 {
        return DisparityField::from_cells(0, 0, Vec::new());
    }
    let channels: Vec<Vec<f64>> = (0..4)
        .map(|i| resize_channel(&field.channel(i), field.rows(), field.cols(), rows, cols))
        .collect();
    let cells = (0..rows * cols)
        .map(|i| ShiftEstimate {
            dx: channels[0][i],
            dy: channels[1][i],
            score_x: channels[2][i],
            score_y: channels[3][i],
        })
        .collect();
    DisparityField::from_cells(rows, cols, cells)
}

fn resize_channel(
    src: &[f64],
    src_rows: usize,
    src_cols: usize,
    rows: usize,
    cols: usize,
) -> Vec<f64> {
    let row_scale = src_rows as f64 / rows as f64;
    let col_scale = src_cols as f64 / cols as f64;
    let overlap = |i: usize, a: f64, b: f64| -> f64 {
        (b.min((i + 1) as f64) - a.max(i as f64)).max(0.0)
    };

    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        let y0 = r as f64 * row_scale;
        let y1 = y0 + row_scale;
        let iy0 = y0.floor() as usize;
        let iy1 = (y1.ceil() as usize).min(src_rows);
        for c in 0..cols {
            let x0 = c as f64 * col_scale;
            let x1 = x0 + col_scale;
            let ix0 = x0.floor() as usize;
            let ix1 = (x1.ceil() as usize).min(src_cols);

            let mut acc = 0.0;
            let mut weight = 0.0;
            for y in iy0..iy1 {
                let wy = overlap(y, y0, y1);
                for x in ix0..ix1 {
                    let v = src[y * src_cols + x];
                    if v.is_finite() {
                        let w = wy * overlap(x, x0, x1);
                        acc += v * w;
                        weight += w;
                    }
                }
            }
            out.push(if weight > 0.0 { acc / weight } else { f64::NAN });
        }
    }
    out
}
