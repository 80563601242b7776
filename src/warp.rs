//! Similarity-transform resampling.
//!
//! A consumer-facing utility for verifying estimates: warping a tile with
//! the shift (and rotation) estimated for it re-aligns it with its
//! reference.

use crate::tile::Tile;

/// Resamples `tile` through a similarity transform.
///
/// The transform rotates by `angle_deg` and scales by `scale` about the tile
/// center, then translates by `(dx, dy)`: each output sample is read from
/// the source at the inverse-mapped position with bilinear interpolation,
/// zero-filled outside the tile.
pub fn warp_similarity(tile: &Tile, dx: f64, dy: f64, angle_deg: f64, scale: f64) -> Tile {
    let width = tile.width();
    let height = tile.height();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let (sin_t, cos_t) = angle_deg.to_radians().sin_cos();

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let qx = x as f64 - cx;
            let qy = y as f64 - cy;
            let sx = (qx * cos_t + qy * sin_t) / scale + cx + dx;
            let sy = (-qx * sin_t + qy * cos_t) / scale + cy + dy;
            data.push(bilinear_sample(tile.data(), width, height, sx, sy));
        }
    }
    Tile::from_raw(width, height, data)
}

/// Bilinear sample of a row-major grid, zero outside its bounds.
pub(crate) fn bilinear_sample(data: &[f64], width: usize, height: usize, x: f64, y: f64) -> f64 {
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let sample = |px: isize, py: isize| -> f64 {
        if px >= 0 && py >= 0 && (px as usize) < width && (py as usize) < height {
            data[py as usize * width + px as usize]
        } else {
            0.0
        }
    };

    let top = sample(x0, y0) * (1.0 - fx) + sample(x0 + 1, y0) * fx;
    let bottom = sample(x0, y0 + 1) * (1.0 - fx) + sample(x0 + 1, y0 + 1) * fx;
    top * (1.0 - fy) + bottom * fy
}
